//! Trade enrichment: applies the per-trade calculators to a record.

use rust_decimal::Decimal;

use crate::calc::{PnlInput, calculate_pnl, calculate_risk_reward, classify_outcome};
use crate::config::{PnlConfig, ReturnBasis};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::logging::{create_trade_enriched_event, log_trade_enriched};

use super::types::{ClosedTrade, OpenTrade, Trade, TradeRecord};

/// Turns raw records into typed, enriched trades.
///
/// Enrichment runs on create and again on every edit; the result is a pure
/// function of the record, so re-enriching an unchanged record is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeEnricher {
    return_basis: ReturnBasis,
}

impl TradeEnricher {
    /// Create an enricher with the given percentage-return basis.
    #[must_use]
    pub const fn new(return_basis: ReturnBasis) -> Self {
        Self { return_basis }
    }

    /// Create an enricher from configuration.
    #[must_use]
    pub const fn from_config(config: &PnlConfig) -> Self {
        Self::new(config.return_basis)
    }

    /// Percentage-return basis in use.
    #[must_use]
    pub const fn return_basis(&self) -> ReturnBasis {
        self.return_basis
    }

    /// Enrich one record.
    ///
    /// Records without an exit price become [`Trade::Open`]; all others are
    /// priced and classified into [`Trade::Closed`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` if any price, quantity, fee or level is
    /// out of range. The record is not enriched.
    pub fn enrich(&self, mut record: TradeRecord) -> AnalyticsResult<Trade> {
        validate_entry(&record)?;
        record.asset_symbol = record.asset_symbol.trim().to_uppercase();

        let risk_reward = calculate_risk_reward(
            record.entry_price,
            record.stop_loss,
            record.take_profit,
            record.direction,
        )?
        .scaled(record.quantity)?;

        let trade = match record.exit_price {
            None => Trade::Open(OpenTrade {
                record,
                risk_reward,
            }),
            Some(exit_price) => {
                let pnl = calculate_pnl(&PnlInput::from_record(&record)?, self.return_basis)?;
                Trade::Closed(ClosedTrade {
                    outcome: classify_outcome(pnl.net_pnl),
                    record,
                    exit_price,
                    pnl,
                    risk_reward,
                })
            }
        };

        log_trade_enriched(&create_trade_enriched_event(&trade));
        Ok(trade)
    }

    /// Enrich a batch, stopping at the first invalid record.
    ///
    /// # Errors
    ///
    /// Returns the first record's `InvalidTradeInput` error.
    pub fn enrich_all(
        &self,
        records: impl IntoIterator<Item = TradeRecord>,
    ) -> AnalyticsResult<Vec<Trade>> {
        records.into_iter().map(|r| self.enrich(r)).collect()
    }

    /// Close an open trade at `exit_price`, adding exit-side fees.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` for a non-positive exit price or negative
    /// fees.
    pub fn close(
        &self,
        trade: OpenTrade,
        exit_price: Decimal,
        exit_fee: Decimal,
        funding_fees: Decimal,
    ) -> AnalyticsResult<ClosedTrade> {
        let mut record = trade.record;
        record.exit_price = Some(exit_price);
        record.exit_fee = exit_fee;
        record.funding_fees = funding_fees;

        match self.enrich(record)? {
            Trade::Closed(closed) => Ok(closed),
            Trade::Open(_) => Err(AnalyticsError::invalid_input(
                "exit_price",
                "closing a trade requires an exit price",
            )),
        }
    }
}

fn validate_entry(record: &TradeRecord) -> AnalyticsResult<()> {
    if record.entry_price <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input(
            "entry_price",
            format!("trade {}: must be positive, got {}", record.id, record.entry_price),
        ));
    }
    if record.quantity <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input(
            "quantity",
            format!("trade {}: must be positive, got {}", record.id, record.quantity),
        ));
    }
    for (field, fee) in [
        ("entry_fee", record.entry_fee),
        ("exit_fee", record.exit_fee),
        ("funding_fees", record.funding_fees),
    ] {
        if fee < Decimal::ZERO {
            return Err(AnalyticsError::invalid_input(
                field,
                format!("trade {}: must not be negative, got {fee}", record.id),
            ));
        }
    }
    Ok(())
}
