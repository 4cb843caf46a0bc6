//! Trade list filtering ahead of aggregation.
//!
//! Every criterion is optional; an empty filter keeps every trade. Matching
//! trades keep their input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trade::{AssetType, Outcome, Trade};

/// Criteria for selecting trades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFilter {
    /// Keep only this asset class.
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    /// Keep only this outcome; `Open` selects trades without an exit.
    #[serde(default)]
    pub outcome: Option<Outcome>,
    /// Earliest `trade_date`, inclusive.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest `trade_date`, inclusive.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl TradeFilter {
    /// A filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one asset class.
    #[must_use]
    pub const fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }

    /// Restrict to one outcome.
    #[must_use]
    pub const fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Restrict to an inclusive date range. Either bound may be open.
    #[must_use]
    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// True when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.asset_type.is_none() && self.outcome.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Whether a single trade passes every criterion.
    #[must_use]
    pub fn matches(&self, trade: &Trade) -> bool {
        let record = trade.record();
        self.asset_type.is_none_or(|a| record.asset_type == a)
            && self.outcome.is_none_or(|o| trade.outcome() == o)
            && self.from.is_none_or(|from| record.trade_date >= from)
            && self.to.is_none_or(|to| record.trade_date <= to)
    }

    /// Trades passing the filter, in input order.
    #[must_use]
    pub fn apply(&self, trades: &[Trade]) -> Vec<Trade> {
        trades.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::{Direction, TradeEnricher, TradeRecord};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn trades() -> Vec<Trade> {
        let enricher = TradeEnricher::default();
        let day = |d: u32| Utc.with_ymd_and_hms(2025, 7, d, 10, 0, 0).unwrap();
        [
            TradeRecord::new("btc", day(1), Direction::Long, dec!(100), dec!(1))
                .with_asset("BTCUSD", AssetType::Crypto)
                .with_exit(dec!(120)),
            TradeRecord::new("aapl", day(2), Direction::Long, dec!(100), dec!(1))
                .with_asset("AAPL", AssetType::Stock)
                .with_exit(dec!(90)),
            TradeRecord::new("eth", day(3), Direction::Short, dec!(100), dec!(1))
                .with_asset("ETHUSD", AssetType::Crypto),
        ]
        .into_iter()
        .map(|r| enricher.enrich(r).unwrap())
        .collect()
    }

    fn ids(trades: &[Trade]) -> Vec<&str> {
        trades.iter().map(|t| t.record().id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let filter = TradeFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&trades()).len(), 3);
    }

    #[test]
    fn test_asset_type() {
        let all = trades();
        let kept = TradeFilter::new().with_asset_type(AssetType::Crypto).apply(&all);
        assert_eq!(ids(&kept), vec!["btc", "eth"]);
    }

    #[test]
    fn test_outcome_open() {
        let all = trades();
        let kept = TradeFilter::new().with_outcome(Outcome::Open).apply(&all);
        assert_eq!(ids(&kept), vec!["eth"]);

        let losses = TradeFilter::new().with_outcome(Outcome::Loss).apply(&all);
        assert_eq!(ids(&losses), vec!["aapl"]);
    }

    #[test]
    fn test_date_range_inclusive() {
        let all = trades();
        let from = Utc.with_ymd_and_hms(2025, 7, 2, 10, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 7, 3, 10, 0, 0).unwrap();
        let kept = TradeFilter::new()
            .with_date_range(Some(from), Some(to))
            .apply(&all);
        assert_eq!(ids(&kept), vec!["aapl", "eth"]);

        let open_ended = TradeFilter::new().with_date_range(None, Some(from)).apply(&all);
        assert_eq!(ids(&open_ended), vec!["btc", "aapl"]);
    }

    #[test]
    fn test_combined_criteria() {
        let all = trades();
        let kept = TradeFilter::new()
            .with_asset_type(AssetType::Crypto)
            .with_outcome(Outcome::Win)
            .apply(&all);
        assert_eq!(ids(&kept), vec!["btc"]);
    }
}
