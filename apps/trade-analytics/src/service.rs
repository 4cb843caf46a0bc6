//! Async entry point for latency-sensitive callers.
//!
//! Aggregation is CPU-bound and never suspends, so the service moves it onto
//! tokio's blocking pool instead of running it on a runtime worker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsResult;
use crate::filter::TradeFilter;
use crate::stats::{Breakdowns, PortfolioStatistics, StatisticsAggregator};
use crate::trade::{ClosedTrade, Trade, TradeEnricher, TradeRecord};

/// Statistics and breakdowns for one filtered view of the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Trades matching the filter, open ones included.
    pub matched_trades: u64,
    /// Matching trades still open.
    pub open_trades: u64,
    /// Snapshot over the matching closed trades.
    pub statistics: PortfolioStatistics,
    /// Per-category breakdowns of the matching closed trades.
    pub breakdowns: Breakdowns,
}

/// Runs enrichment and aggregation off the async executor.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    enricher: TradeEnricher,
    aggregator: Arc<StatisticsAggregator>,
}

impl StatisticsService {
    /// Create a service from configuration.
    #[must_use]
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            enricher: TradeEnricher::from_config(&config.pnl),
            aggregator: Arc::new(StatisticsAggregator::new(config.statistics.clone())),
        }
    }

    /// Enricher used for inbound records.
    #[must_use]
    pub const fn enricher(&self) -> &TradeEnricher {
        &self.enricher
    }

    /// Aggregate a trade list on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` under the strict policy, or `Worker` if
    /// the blocking task panicked.
    pub async fn compute(&self, trades: Vec<Trade>) -> AnalyticsResult<PortfolioStatistics> {
        let aggregator = Arc::clone(&self.aggregator);
        tokio::task::spawn_blocking(move || aggregator.aggregate_trades(&trades)).await?
    }

    /// Enrich raw records, filter them and build a full report.
    ///
    /// Records are put in chronological order and open trades are split off
    /// before aggregation, so the report never trips the aggregation policy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` for the first invalid record, plus the
    /// errors of [`compute`](Self::compute).
    pub async fn report(
        &self,
        records: Vec<TradeRecord>,
        filter: TradeFilter,
    ) -> AnalyticsResult<StatisticsReport> {
        let enricher = self.enricher;
        let aggregator = Arc::clone(&self.aggregator);

        tokio::task::spawn_blocking(move || -> AnalyticsResult<StatisticsReport> {
            let mut trades = enricher.enrich_all(records)?;
            trades.sort_by_key(Trade::trade_date);

            let matched = filter.apply(&trades);
            let closed: Vec<ClosedTrade> =
                matched.iter().filter_map(|t| t.as_closed().cloned()).collect();
            let open_trades = (matched.len() - closed.len()) as u64;

            let statistics = aggregator.aggregate(&closed)?;
            let breakdowns = aggregator.breakdowns(&closed);

            info!(
                matched = matched.len(),
                open = open_trades,
                filtered = !filter.is_empty(),
                "Statistics report built"
            );

            Ok(StatisticsReport {
                matched_trades: matched.len() as u64,
                open_trades,
                statistics,
                breakdowns,
            })
        })
        .await?
    }
}
