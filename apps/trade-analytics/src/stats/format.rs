//! Plain-text rendering of statistics for terminal output.

use std::fmt::Write;

use rust_decimal::Decimal;

use super::types::{Breakdowns, BreakdownBucket, PortfolioStatistics, ProfitFactor, StreakKind};

/// Format a value that is already a percentage (12.5 -> "12.50%").
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{value:.2}%")
}

/// Format a decimal with 2 decimal places.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Format an optional ratio.
#[must_use]
pub fn format_ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// Format a profit factor, naming the degenerate cases.
#[must_use]
pub fn format_profit_factor(value: ProfitFactor) -> String {
    match value {
        ProfitFactor::Ratio(v) => format!("{v:.2}"),
        ProfitFactor::NoLosses => "no losses".to_string(),
        ProfitFactor::NoData => "N/A".to_string(),
    }
}

/// Render a statistics snapshot as an aligned text report.
#[must_use]
pub fn render_summary(stats: &PortfolioStatistics) -> String {
    let mut out = String::new();
    let rows = [
        ("Total trades", stats.total_trades.to_string()),
        (
            "Wins / losses / breakeven",
            format!(
                "{} / {} / {}",
                stats.winning_trades, stats.losing_trades, stats.breakeven_trades
            ),
        ),
        ("Win rate", format_pct(stats.win_rate)),
        ("Loss rate", format_pct(stats.loss_rate)),
        ("Net profit", format_decimal(stats.total_net_profit)),
        ("Gross profit", format_decimal(stats.total_gross_profit)),
        ("Gross loss", format_decimal(stats.total_gross_loss)),
        ("Fees", format_decimal(stats.total_fees)),
        ("Profit factor", format_profit_factor(stats.profit_factor)),
        ("Average win", format_decimal(stats.average_win)),
        ("Average loss", format_decimal(stats.average_loss)),
        ("Payoff ratio", format_ratio(stats.payoff_ratio)),
        ("Expectancy", format_decimal(stats.expectancy)),
        ("Average R:R", format_decimal(stats.average_risk_reward)),
        ("Largest win", format_decimal(stats.largest_win)),
        ("Largest loss", format_decimal(stats.largest_loss)),
        (
            "Max streaks (W/L)",
            format!("{} / {}", stats.consecutive_wins, stats.consecutive_losses),
        ),
        (
            "Current streak",
            stats.current_streak.map_or_else(
                || "-".to_string(),
                |s| match s.kind {
                    StreakKind::Win => format!("{}W", s.length),
                    StreakKind::Loss => format!("{}L", s.length),
                },
            ),
        ),
        ("Max drawdown", format_decimal(stats.max_drawdown)),
        ("Max drawdown %", format_pct(stats.max_drawdown_percentage)),
        ("Sharpe ratio", format_decimal(stats.sharpe_ratio)),
        ("Sortino ratio", format_decimal(stats.sortino_ratio)),
        ("Trading days", stats.daily.trading_days.to_string()),
        ("Average daily P&L", format_decimal(stats.daily.average_daily_pnl)),
        ("Best day", format_decimal(stats.daily.best_day)),
        ("Worst day", format_decimal(stats.daily.worst_day)),
    ];

    for (label, value) in rows {
        let _ = writeln!(out, "{label:<28}{value}");
    }
    out
}

/// Render breakdown tables.
#[must_use]
pub fn render_breakdowns(breakdowns: &Breakdowns) -> String {
    let mut out = String::new();
    for (title, buckets) in [
        ("By asset type", &breakdowns.by_asset_type),
        ("By strategy", &breakdowns.by_strategy),
        ("By timeframe", &breakdowns.by_timeframe),
    ] {
        if buckets.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{title}");
        for bucket in buckets {
            write_bucket(&mut out, bucket);
        }
    }
    out
}

fn write_bucket(out: &mut String, bucket: &BreakdownBucket) {
    let _ = writeln!(
        out,
        "  {:<24}{:>6} trades  {:>8}  {:>12}",
        bucket.key,
        bucket.trades,
        format_pct(bucket.win_rate),
        format_decimal(bucket.net_pnl),
    );
}
