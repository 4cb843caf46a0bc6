//! Configuration for the analytics engine.
//!
//! Configuration is optional: every section has defaults, so an empty YAML
//! document (or [`AnalyticsConfig::default`]) yields a working engine. Values
//! may reference environment variables with `${VAR}` or `${VAR:-default}`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_analytics::config::load_config;
//!
//! let config = load_config(Some("trade-analytics.yaml"))?;
//! println!("deviation: {:?}", config.statistics.deviation);
//! ```
//!
//! # Example
//!
//! ```yaml
//! statistics:
//!   deviation: SAMPLE
//!   annualization_periods: 252
//!   risk_free_rate: "0"
//!   initial_equity: "${JOURNAL_START_EQUITY:-0}"
//!   aggregation_policy: LENIENT
//! pnl:
//!   return_basis: MARGIN
//! logging:
//!   filter: info
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "trade-analytics.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Portfolio statistics configuration.
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// Per-trade P&L configuration.
    #[serde(default)]
    pub pnl: PnlConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Standard deviation estimator used by the Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviationMode {
    /// Sample standard deviation (Bessel's correction, n - 1).
    #[default]
    Sample,
    /// Population standard deviation (n).
    Population,
}

/// How the aggregator treats open or out-of-order trades at its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationPolicy {
    /// Reject open or unsorted input with a precondition error.
    Strict,
    /// Drop open trades and stable-sort by trade date, logging each correction.
    Lenient,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Denominator used for a trade's percentage return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnBasis {
    /// Return on committed margin: `entry_price * quantity / leverage`.
    #[default]
    Margin,
    /// Return on full notional: `entry_price * quantity`, leverage ignored.
    Notional,
}

/// Portfolio statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Standard deviation estimator for Sharpe.
    #[serde(default)]
    pub deviation: DeviationMode,
    /// Periods per year for annualizing Sharpe/Sortino (e.g. 252). `None` disables.
    #[serde(default)]
    pub annualization_periods: Option<u32>,
    /// Per-trade risk-free return in percent, subtracted from the mean sample.
    #[serde(default)]
    pub risk_free_rate: Decimal,
    /// Equity the drawdown curve starts from.
    #[serde(default)]
    pub initial_equity: Decimal,
    /// Boundary policy for open or unsorted trades.
    #[serde(default)]
    pub aggregation_policy: AggregationPolicy,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            deviation: DeviationMode::Sample,
            annualization_periods: None,
            risk_free_rate: Decimal::ZERO,
            initial_equity: Decimal::ZERO,
            aggregation_policy: AggregationPolicy::default(),
        }
    }
}

/// Per-trade P&L configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PnlConfig {
    /// Percentage-return denominator.
    #[serde(default)]
    pub return_basis: ReturnBasis,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Include event targets in console output.
    #[serde(default)]
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            with_target: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<AnalyticsConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<AnalyticsConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    if interpolated.trim().is_empty() {
        return Ok(AnalyticsConfig::default());
    }
    let config: AnalyticsConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` describing the first invalid value.
pub fn validate_config(config: &AnalyticsConfig) -> Result<(), ConfigError> {
    let stats = &config.statistics;

    if stats.initial_equity < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "statistics.initial_equity must not be negative".to_string(),
        ));
    }

    if stats.risk_free_rate < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "statistics.risk_free_rate must not be negative".to_string(),
        ));
    }

    if stats.annualization_periods == Some(0) {
        return Err(ConfigError::ValidationError(
            "statistics.annualization_periods must be positive when set".to_string(),
        ));
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.filter must not be empty".to_string(),
        ));
    }

    Ok(())
}
