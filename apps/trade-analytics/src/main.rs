//! Trade Analytics Binary
//!
//! Reads a JSON array of trade records, enriches them, and prints the
//! statistics report for the selected trades.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trade-analytics -- trades.json [config.yaml]
//! ```
//!
//! # Environment Variables
//!
//! - `ANALYTICS_ASSET_TYPE`: keep one asset class (e.g. `crypto`)
//! - `ANALYTICS_OUTCOME`: keep one outcome (`win`, `loss`, `breakeven`, `open`)
//! - `ANALYTICS_FROM` / `ANALYTICS_TO`: inclusive RFC 3339 date bounds
//! - `ANALYTICS_OUTPUT`: `json` (default) or `text`
//! - `RUST_LOG`: log filter (default from config, else `info`)

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use trade_analytics::config::DEFAULT_CONFIG_PATH;
use trade_analytics::stats::{render_breakdowns, render_summary};
use trade_analytics::telemetry::init_telemetry;
use trade_analytics::{AnalyticsConfig, StatisticsService, TradeFilter, TradeRecord, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(trades_path) = args.next() else {
        bail!("usage: trade-analytics <trades.json> [config.yaml]");
    };
    let config = resolve_config(args.next().as_deref())?;

    init_telemetry(&config.logging);

    let contents = std::fs::read_to_string(&trades_path)
        .with_context(|| format!("Failed to read trades file '{trades_path}'"))?;
    let records: Vec<TradeRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse trades file '{trades_path}'"))?;

    tracing::info!(path = %trades_path, records = records.len(), "Loaded trade records");

    let filter = filter_from_env()?;
    let service = StatisticsService::new(&config);
    let report = service.report(records, filter).await?;

    if std::env::var("ANALYTICS_OUTPUT").is_ok_and(|v| v.eq_ignore_ascii_case("text")) {
        print!("{}", render_summary(&report.statistics));
        print!("{}", render_breakdowns(&report.breakdowns));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Explicit path must exist; the default path is optional.
fn resolve_config(path: Option<&str>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => Ok(load_config(Some(path))?),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Ok(load_config(None)?),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn filter_from_env() -> Result<TradeFilter> {
    Ok(TradeFilter {
        asset_type: env_label("ANALYTICS_ASSET_TYPE")?,
        outcome: env_label("ANALYTICS_OUTCOME")?,
        from: env_date("ANALYTICS_FROM")?,
        to: env_date("ANALYTICS_TO")?,
    })
}

/// Parse a lowercase enum label using its serde name.
fn env_label<T: DeserializeOwned>(name: &str) -> Result<Option<T>> {
    let Ok(value) = std::env::var(name) else {
        return Ok(None);
    };
    let parsed = serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .with_context(|| format!("Invalid {name}: '{value}'"))?;
    Ok(Some(parsed))
}

fn env_date(name: &str) -> Result<Option<DateTime<Utc>>> {
    let Ok(value) = std::env::var(name) else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(&value)
        .with_context(|| format!("Invalid {name}: '{value}'"))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}
