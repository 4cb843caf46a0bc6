//! Console tracing setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directive; overrides `logging.filter` from the config
//! - `NODE_ENV=development`: ANSI colors on
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_analytics::telemetry::init_telemetry;
//!
//! init_telemetry(&config.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the event filter: `RUST_LOG` if set and valid, else the configured
/// directive, else `info`.
#[must_use]
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global console subscriber.
///
/// Returns `false` if a global subscriber was already installed (as happens
/// when tests call this more than once).
pub fn init_telemetry(config: &LoggingConfig) -> bool {
    let is_development = std::env::var("NODE_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_target(config.with_target)
        .with_ansi(is_development)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_falls_back() {
        let config = LoggingConfig {
            filter: "not a [valid filter".to_string(),
            with_target: false,
        };
        // Must not panic regardless of RUST_LOG
        let _filter = build_env_filter(&config);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        let _ = init_telemetry(&config);
        assert!(!init_telemetry(&config));
    }
}
