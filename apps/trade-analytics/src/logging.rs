//! Structured logging for enrichment and aggregation.
//!
//! # Log Levels
//!
//! - **INFO**: Statistics snapshot computed
//! - **WARN**: Aggregation input corrected under the lenient policy
//! - **DEBUG**: Per-trade enrichment results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::stats::PortfolioStatistics;
use crate::trade::{Outcome, Trade};

// ============================================
// Event Types
// ============================================

/// Analytics event for structured logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A trade was enriched.
    TradeEnriched(TradeEnrichedEvent),
    /// A statistics snapshot was computed.
    StatisticsComputed(StatisticsComputedEvent),
    /// Aggregation input was corrected.
    PreconditionCorrected(PreconditionCorrectedEvent),
}

impl AnalyticsEvent {
    /// Emit the event through `tracing` at its level.
    pub fn emit(&self) {
        match self {
            Self::TradeEnriched(e) => log_trade_enriched(e),
            Self::StatisticsComputed(e) => log_statistics_computed(e),
            Self::PreconditionCorrected(e) => log_precondition_corrected(e),
        }
    }
}

/// Trade enriched event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEnrichedEvent {
    /// Trade ID.
    pub trade_id: String,
    /// Outcome after enrichment.
    pub outcome: Outcome,
    /// Net P&L (closed trades only).
    pub net_pnl: Option<Decimal>,
    /// Percentage return (closed trades only).
    pub pnl_percentage: Option<Decimal>,
    /// Risk:reward ratio, when defined.
    pub risk_reward_ratio: Option<Decimal>,
}

/// Statistics computed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsComputedEvent {
    /// Closed trades aggregated.
    pub total_trades: u64,
    /// Win rate (%).
    pub win_rate: Decimal,
    /// Total net profit.
    pub total_net_profit: Decimal,
    /// Profit factor, when a ratio exists.
    pub profit_factor: Option<Decimal>,
    /// Max drawdown.
    pub max_drawdown: Decimal,
    /// Sharpe ratio.
    pub sharpe_ratio: Decimal,
    /// Sortino ratio.
    pub sortino_ratio: Decimal,
    /// Computation time in microseconds.
    pub duration_us: u64,
}

/// Kind of correction applied at the aggregation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Correction {
    /// Open trades were removed from the input.
    DroppedOpenTrades,
    /// Closed trades were re-ordered by trade date.
    SortedByDate,
}

/// Precondition corrected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconditionCorrectedEvent {
    /// What was corrected.
    pub correction: Correction,
    /// Trades affected (dropped, or total re-ordered).
    pub affected: usize,
}

// ============================================
// Logging Functions
// ============================================

/// Log trade enrichment.
pub fn log_trade_enriched(event: &TradeEnrichedEvent) {
    debug!(
        trade_id = %event.trade_id,
        outcome = ?event.outcome,
        net_pnl = ?event.net_pnl,
        pnl_percentage = ?event.pnl_percentage,
        risk_reward_ratio = ?event.risk_reward_ratio,
        "Trade enriched"
    );
}

/// Log a computed statistics snapshot.
pub fn log_statistics_computed(event: &StatisticsComputedEvent) {
    info!(
        total_trades = event.total_trades,
        win_rate = %event.win_rate,
        total_net_profit = %event.total_net_profit,
        profit_factor = ?event.profit_factor,
        max_drawdown = %event.max_drawdown,
        sharpe_ratio = %event.sharpe_ratio,
        sortino_ratio = %event.sortino_ratio,
        duration_us = event.duration_us,
        "Statistics computed"
    );
}

/// Log a boundary correction.
pub fn log_precondition_corrected(event: &PreconditionCorrectedEvent) {
    warn!(
        correction = ?event.correction,
        affected = event.affected,
        "Aggregation input corrected"
    );
}

// ============================================
// Helper Functions
// ============================================

/// Create a trade enriched event.
#[must_use]
pub fn create_trade_enriched_event(trade: &Trade) -> TradeEnrichedEvent {
    let closed = trade.as_closed();
    let risk_reward = match trade {
        Trade::Open(t) => t.risk_reward(),
        Trade::Closed(t) => t.risk_reward(),
    };

    TradeEnrichedEvent {
        trade_id: trade.record().id.to_string(),
        outcome: trade.outcome(),
        net_pnl: closed.map(|t| t.net_pnl()),
        pnl_percentage: closed.map(|t| t.pnl_percentage()),
        risk_reward_ratio: risk_reward.and_then(|rr| rr.ratio),
    }
}

/// Create a statistics computed event.
#[must_use]
pub fn create_statistics_computed_event(
    stats: &PortfolioStatistics,
    duration_us: u64,
) -> StatisticsComputedEvent {
    StatisticsComputedEvent {
        total_trades: stats.total_trades,
        win_rate: stats.win_rate,
        total_net_profit: stats.total_net_profit,
        profit_factor: stats.profit_factor.value(),
        max_drawdown: stats.max_drawdown,
        sharpe_ratio: stats.sharpe_ratio,
        sortino_ratio: stats.sortino_ratio,
        duration_us,
    }
}
