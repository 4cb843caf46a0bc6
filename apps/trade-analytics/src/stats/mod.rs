//! Portfolio statistics over closed trades.
//!
//! Implements the journal's aggregate metrics:
//! - Counts, win/loss rates and profit factor
//! - Averages, expectancy and payoff ratio
//! - Consecutive and current streaks
//! - Maximum drawdown of the cumulative net P&L curve
//! - Sharpe and Sortino ratios over per-trade percentage returns
//! - Daily and per-category breakdowns

mod aggregator;
mod breakdown;
pub(crate) mod constants;
mod daily;
mod format;
mod math;
mod prepare;
mod types;

pub use aggregator::StatisticsAggregator;
pub use breakdown::{breakdown_by, compute_breakdowns};
pub use daily::daily_statistics;
pub use format::{
    format_decimal, format_pct, format_profit_factor, format_ratio, render_breakdowns,
    render_summary,
};
pub use math::{checked_sum, downside_deviation, mean, sqrt_decimal, std_dev};
pub use prepare::{ensure_sorted, first_out_of_order, prepare};
pub use types::{
    BreakdownBucket, Breakdowns, CurrentStreak, DailyStatistics, DayPnl, PortfolioStatistics,
    ProfitFactor, StreakKind,
};
