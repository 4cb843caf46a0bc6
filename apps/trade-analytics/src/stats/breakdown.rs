//! Per-category performance breakdowns.
//!
//! Buckets are independent of each other and of ordering, so each bucket is
//! summarized on the rayon pool.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::constants::HUNDRED;
use super::types::{BreakdownBucket, Breakdowns};
use crate::trade::{ClosedTrade, Outcome};

/// Group closed trades by asset type, strategy and timeframe.
///
/// Buckets are ordered by key. Trades without a strategy or timeframe label
/// are left out of that dimension.
#[must_use]
pub fn compute_breakdowns(trades: &[ClosedTrade]) -> Breakdowns {
    let ((by_asset_type, by_strategy), by_timeframe) = rayon::join(
        || {
            rayon::join(
                || breakdown_by(trades, |t| Some(t.record().asset_type.as_str().to_string())),
                || breakdown_by(trades, |t| t.record().strategy.clone()),
            )
        },
        || breakdown_by(trades, |t| t.record().timeframe.clone()),
    );

    debug!(
        asset_types = by_asset_type.len(),
        strategies = by_strategy.len(),
        timeframes = by_timeframe.len(),
        "Computed breakdowns"
    );

    Breakdowns {
        by_asset_type,
        by_strategy,
        by_timeframe,
    }
}

/// Group by an arbitrary key and summarize each group.
pub fn breakdown_by<F>(trades: &[ClosedTrade], key: F) -> Vec<BreakdownBucket>
where
    F: Fn(&ClosedTrade) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<&ClosedTrade>> = BTreeMap::new();
    for trade in trades {
        if let Some(k) = key(trade) {
            groups.entry(k).or_default().push(trade);
        }
    }

    let groups: Vec<(String, Vec<&ClosedTrade>)> = groups.into_iter().collect();
    groups
        .into_par_iter()
        .map(|(key, members)| summarize(key, &members))
        .collect()
}

fn summarize(key: String, members: &[&ClosedTrade]) -> BreakdownBucket {
    let trades = members.len() as u64;
    let wins = members
        .iter()
        .filter(|t| t.outcome() == Outcome::Win)
        .count() as u64;
    let win_rate = if trades > 0 {
        Decimal::from(wins) / Decimal::from(trades) * HUNDRED
    } else {
        Decimal::ZERO
    };

    BreakdownBucket {
        key,
        trades,
        wins,
        win_rate,
        net_pnl: members
            .iter()
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.net_pnl())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::{AssetType, Direction, Trade, TradeEnricher, TradeRecord};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn closed(id: &str, asset: AssetType, strategy: Option<&str>, exit: Decimal) -> ClosedTrade {
        let mut record = TradeRecord::new(
            id,
            Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
            Direction::Long,
            dec!(100),
            dec!(2),
        )
        .with_asset("X", asset)
        .with_exit(exit);
        record.strategy = strategy.map(str::to_string);

        match TradeEnricher::default().enrich(record).unwrap() {
            Trade::Closed(t) => t,
            Trade::Open(_) => panic!("expected closed trade"),
        }
    }

    #[test]
    fn test_breakdown_by_asset_type() {
        let trades = vec![
            closed("a", AssetType::Crypto, None, dec!(110)),
            closed("b", AssetType::Crypto, None, dec!(95)),
            closed("c", AssetType::Stock, None, dec!(101)),
        ];
        let breakdowns = compute_breakdowns(&trades);

        assert_eq!(breakdowns.by_asset_type.len(), 2);
        let crypto = &breakdowns.by_asset_type[0];
        assert_eq!(crypto.key, "crypto");
        assert_eq!(crypto.trades, 2);
        assert_eq!(crypto.wins, 1);
        assert_eq!(crypto.win_rate, dec!(50));
        assert_eq!(crypto.net_pnl, dec!(10));

        let stock = &breakdowns.by_asset_type[1];
        assert_eq!(stock.key, "stock");
        assert_eq!(stock.win_rate, dec!(100));
    }

    #[test]
    fn test_unlabeled_trades_skipped() {
        let trades = vec![
            closed("a", AssetType::Stock, Some("breakout"), dec!(110)),
            closed("b", AssetType::Stock, None, dec!(90)),
        ];
        let breakdowns = compute_breakdowns(&trades);

        assert_eq!(breakdowns.by_strategy.len(), 1);
        assert_eq!(breakdowns.by_strategy[0].key, "breakout");
        assert_eq!(breakdowns.by_strategy[0].trades, 1);
        assert!(breakdowns.by_timeframe.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compute_breakdowns(&[]), Breakdowns::default());
    }
}
