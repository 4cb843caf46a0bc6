//! Day-level grouping of closed trades.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{DailyStatistics, DayPnl};
use crate::trade::ClosedTrade;

/// Group trades by the UTC calendar day of `trade_date`. Day totals saturate
/// at the decimal range.
#[must_use]
pub fn daily_statistics(trades: &[ClosedTrade]) -> DailyStatistics {
    let mut by_day: BTreeMap<NaiveDate, DayPnl> = BTreeMap::new();
    for trade in trades {
        let date = trade.trade_date().date_naive();
        let day = by_day.entry(date).or_insert(DayPnl {
            date,
            net_pnl: Decimal::ZERO,
            trades: 0,
        });
        day.net_pnl = day.net_pnl.saturating_add(trade.net_pnl());
        day.trades += 1;
    }

    if by_day.is_empty() {
        return DailyStatistics::default();
    }

    let days: Vec<DayPnl> = by_day.into_values().collect();
    let trading_days = days.len() as u64;
    let total = days
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.net_pnl));

    DailyStatistics {
        trading_days,
        profitable_days: days.iter().filter(|d| d.net_pnl > Decimal::ZERO).count() as u64,
        losing_days: days.iter().filter(|d| d.net_pnl < Decimal::ZERO).count() as u64,
        average_daily_pnl: total / Decimal::from(trading_days),
        best_day: days.iter().map(|d| d.net_pnl).max().unwrap_or_default(),
        worst_day: days.iter().map(|d| d.net_pnl).min().unwrap_or_default(),
        days,
    }
}
