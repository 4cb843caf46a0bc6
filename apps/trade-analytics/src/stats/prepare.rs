//! Aggregation boundary: closed-ness and chronological order.
//!
//! The aggregator only sees `ClosedTrade` values in ascending `trade_date`
//! order. These functions establish that under an [`AggregationPolicy`].

use std::borrow::Cow;

use crate::config::AggregationPolicy;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::logging::{Correction, PreconditionCorrectedEvent, log_precondition_corrected};
use crate::trade::{ClosedTrade, Trade};

/// Index of the first trade dated before its predecessor.
#[must_use]
pub fn first_out_of_order(trades: &[ClosedTrade]) -> Option<usize> {
    trades
        .windows(2)
        .position(|w| w[1].trade_date() < w[0].trade_date())
        .map(|i| i + 1)
}

/// Select the closed trades of a mixed list, in chronological order.
///
/// # Errors
///
/// Under [`AggregationPolicy::Strict`], returns `PreconditionViolation` if any
/// trade is open or the list is out of order.
pub fn prepare(trades: &[Trade], policy: AggregationPolicy) -> AnalyticsResult<Vec<ClosedTrade>> {
    let open = trades.iter().filter(|t| t.as_closed().is_none()).count();

    if open > 0 {
        match policy {
            AggregationPolicy::Strict => {
                let first = trades
                    .iter()
                    .find(|t| t.as_closed().is_none())
                    .map(|t| t.record().id.to_string())
                    .unwrap_or_default();
                return Err(AnalyticsError::precondition(format!(
                    "{open} open trade(s) passed to aggregation, first: {first}"
                )));
            }
            AggregationPolicy::Lenient => {
                log_precondition_corrected(&PreconditionCorrectedEvent {
                    correction: Correction::DroppedOpenTrades,
                    affected: open,
                });
            }
        }
    }

    let closed: Vec<ClosedTrade> = trades.iter().filter_map(|t| t.as_closed().cloned()).collect();
    Ok(ensure_sorted(Cow::Owned(closed), policy)?.into_owned())
}

/// Check or establish chronological order of closed trades.
///
/// Sorted input is borrowed unchanged. Lenient correction is a stable sort,
/// so trades sharing a `trade_date` keep their relative order.
///
/// # Errors
///
/// Under [`AggregationPolicy::Strict`], returns `PreconditionViolation` for
/// unsorted input.
pub fn ensure_sorted(
    trades: Cow<'_, [ClosedTrade]>,
    policy: AggregationPolicy,
) -> AnalyticsResult<Cow<'_, [ClosedTrade]>> {
    let Some(index) = first_out_of_order(&trades) else {
        return Ok(trades);
    };

    match policy {
        AggregationPolicy::Strict => Err(AnalyticsError::precondition(format!(
            "trades not in chronological order: {} at position {index} precedes {}",
            trades[index].id(),
            trades[index - 1].id()
        ))),
        AggregationPolicy::Lenient => {
            let mut sorted = trades.into_owned();
            sorted.sort_by_key(ClosedTrade::trade_date);
            log_precondition_corrected(&PreconditionCorrectedEvent {
                correction: Correction::SortedByDate,
                affected: sorted.len(),
            });
            Ok(Cow::Owned(sorted))
        }
    }
}
