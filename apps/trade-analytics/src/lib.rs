// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Analytics - Rust Core Library
//!
//! Performance analytics for a trading journal.
//!
//! # Pipeline
//!
//! - **trade**: `TradeRecord` inputs and the `Open`/`Closed` lifecycle
//! - **calc**: per-trade P&L, risk:reward and outcome, applied once per
//!   create/edit by `TradeEnricher`
//! - **filter**: asset type, outcome and date range selection
//! - **stats**: `StatisticsAggregator`, folding closed trades into a
//!   `PortfolioStatistics` snapshot, plus daily and per-category breakdowns
//! - **service**: blocking-pool offload for async callers
//!
//! Everything below `service` is synchronous and free of I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Per-trade calculators.
pub mod calc;

/// Configuration loading.
pub mod config;

/// Error types.
pub mod error;

/// Trade list filtering.
pub mod filter;

/// Structured log events.
pub mod logging;

/// Async service wrapper.
pub mod service;

/// Portfolio statistics.
pub mod stats;

/// Tracing subscriber setup.
pub mod telemetry;

/// Trade records and lifecycle.
pub mod trade;

pub use config::{AnalyticsConfig, load_config};
pub use error::{AnalyticsError, AnalyticsResult, ErrorCode};
pub use filter::TradeFilter;
pub use service::{StatisticsReport, StatisticsService};
pub use stats::{PortfolioStatistics, ProfitFactor, StatisticsAggregator};
pub use trade::{ClosedTrade, OpenTrade, Trade, TradeEnricher, TradeRecord};
