//! Output types of the statistics aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gross profit over absolute gross loss.
///
/// The two degenerate cases are explicit variants so that no infinite or
/// sentinel number reaches a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    /// Both profit and loss present.
    Ratio(Decimal),
    /// Profits but no losses.
    NoLosses,
    /// Neither profit nor loss.
    NoData,
}

impl ProfitFactor {
    /// Build from gross totals. The sign of `gross_loss` is ignored, and a
    /// ratio beyond the decimal range saturates.
    #[must_use]
    pub fn from_totals(gross_profit: Decimal, gross_loss: Decimal) -> Self {
        let loss = gross_loss.abs();
        if loss > Decimal::ZERO {
            Self::Ratio(gross_profit.abs().checked_div(loss).unwrap_or(Decimal::MAX))
        } else if gross_profit > Decimal::ZERO {
            Self::NoLosses
        } else {
            Self::NoData
        }
    }

    /// Numeric ratio, if one exists.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        match self {
            Self::Ratio(v) => Some(*v),
            Self::NoLosses | Self::NoData => None,
        }
    }
}

/// Direction of a run of consecutive outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    /// Consecutive winners.
    Win,
    /// Consecutive losers.
    Loss,
}

/// Run still in progress at the most recent trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStreak {
    /// Winning or losing run.
    pub kind: StreakKind,
    /// Number of trades in the run.
    pub length: u64,
}

/// Net P&L of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPnl {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Sum of net P&L of the trades opened that day.
    pub net_pnl: Decimal,
    /// Trades opened that day.
    pub trades: u64,
}

/// Day-level view of the trade list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatistics {
    /// Days with at least one trade.
    pub trading_days: u64,
    /// Days with positive net P&L.
    pub profitable_days: u64,
    /// Days with negative net P&L.
    pub losing_days: u64,
    /// Total net P&L / trading days.
    pub average_daily_pnl: Decimal,
    /// Highest daily net P&L, 0 when there are no days.
    pub best_day: Decimal,
    /// Lowest daily net P&L, 0 when there are no days.
    pub worst_day: Decimal,
    /// Per-day totals in date order.
    pub days: Vec<DayPnl>,
}

/// One group of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownBucket {
    /// Group label.
    pub key: String,
    /// Trades in the group.
    pub trades: u64,
    /// Winners in the group.
    pub wins: u64,
    /// `wins / trades * 100`.
    pub win_rate: Decimal,
    /// Sum of net P&L.
    pub net_pnl: Decimal,
}

/// Per-category performance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    /// Grouped by asset class.
    pub by_asset_type: Vec<BreakdownBucket>,
    /// Grouped by strategy label; unlabeled trades are skipped.
    pub by_strategy: Vec<BreakdownBucket>,
    /// Grouped by timeframe label; unlabeled trades are skipped.
    pub by_timeframe: Vec<BreakdownBucket>,
}

/// Portfolio-level statistics snapshot.
///
/// Recomputed from the trade list on every request and never patched
/// incrementally. Rates and returns are percentages (12.5 = 12.5%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    /// Closed trades considered.
    pub total_trades: u64,
    /// Trades with positive net P&L.
    pub winning_trades: u64,
    /// Trades with negative net P&L.
    pub losing_trades: u64,
    /// Trades with zero net P&L.
    pub breakeven_trades: u64,
    /// `winning_trades / total_trades * 100`.
    pub win_rate: Decimal,
    /// `losing_trades / total_trades * 100`.
    pub loss_rate: Decimal,
    /// Sum of gross P&L over winners.
    pub total_gross_profit: Decimal,
    /// Sum of gross P&L over losers.
    pub total_gross_loss: Decimal,
    /// Sum of net P&L over all trades.
    pub total_net_profit: Decimal,
    /// Sum of all fees.
    pub total_fees: Decimal,
    /// Gross profit / |gross loss|.
    pub profit_factor: ProfitFactor,
    /// Mean gross P&L of winners.
    pub average_win: Decimal,
    /// Mean absolute gross P&L of losers.
    pub average_loss: Decimal,
    /// `average_win / average_loss`, when there are losses.
    pub payoff_ratio: Option<Decimal>,
    /// Mean net P&L per trade.
    pub expectancy: Decimal,
    /// Mean of defined risk:reward ratios.
    pub average_risk_reward: Decimal,
    /// Largest net P&L among winners.
    pub largest_win: Decimal,
    /// Smallest net P&L among losers.
    pub largest_loss: Decimal,
    /// Longest winning run.
    pub consecutive_wins: u64,
    /// Longest losing run.
    pub consecutive_losses: u64,
    /// Run in progress at the last trade.
    pub current_streak: Option<CurrentStreak>,
    /// Largest peak-to-trough decline of cumulative net P&L.
    pub max_drawdown: Decimal,
    /// `max_drawdown` relative to the peak it fell from.
    pub max_drawdown_percentage: Decimal,
    /// Mean excess return / standard deviation.
    pub sharpe_ratio: Decimal,
    /// Mean excess return / downside deviation.
    pub sortino_ratio: Decimal,
    /// Day-level view.
    pub daily: DailyStatistics,
}

impl Default for PortfolioStatistics {
    fn default() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            breakeven_trades: 0,
            win_rate: Decimal::ZERO,
            loss_rate: Decimal::ZERO,
            total_gross_profit: Decimal::ZERO,
            total_gross_loss: Decimal::ZERO,
            total_net_profit: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            profit_factor: ProfitFactor::NoData,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            payoff_ratio: None,
            expectancy: Decimal::ZERO,
            average_risk_reward: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            consecutive_wins: 0,
            consecutive_losses: 0,
            current_streak: None,
            max_drawdown: Decimal::ZERO,
            max_drawdown_percentage: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            sortino_ratio: Decimal::ZERO,
            daily: DailyStatistics::default(),
        }
    }
}
