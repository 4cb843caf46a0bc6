//! Per-trade profit and loss.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ReturnBasis;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::stats::constants::HUNDRED;
use crate::trade::{Direction, TradeRecord};

/// Inputs required to price a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnlInput {
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    pub exit_price: Decimal,
    /// Units traded.
    pub quantity: Decimal,
    /// Long or short.
    pub direction: Direction,
    /// Fee paid on entry.
    pub entry_fee: Decimal,
    /// Fee paid on exit.
    pub exit_fee: Decimal,
    /// Funding/borrow fees.
    pub funding_fees: Decimal,
    /// Leverage multiplier.
    pub leverage: Decimal,
}

impl PnlInput {
    /// Extract the P&L inputs from a record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` if the record has no exit price.
    pub fn from_record(record: &TradeRecord) -> AnalyticsResult<Self> {
        let exit_price = record.exit_price.ok_or_else(|| {
            AnalyticsError::invalid_input(
                "exit_price",
                format!("trade {} has no exit price", record.id),
            )
        })?;

        Ok(Self {
            entry_price: record.entry_price,
            exit_price,
            quantity: record.quantity,
            direction: record.direction,
            entry_fee: record.entry_fee,
            exit_fee: record.exit_fee,
            funding_fees: record.funding_fees,
            leverage: record.leverage,
        })
    }

    /// Sum of all fees; `None` if it leaves the decimal range.
    #[must_use]
    pub fn total_fees(&self) -> Option<Decimal> {
        self.entry_fee
            .checked_add(self.exit_fee)?
            .checked_add(self.funding_fees)
    }

    fn validate(&self) -> AnalyticsResult<()> {
        if self.entry_price <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_input(
                "entry_price",
                format!("must be positive, got {}", self.entry_price),
            ));
        }
        if self.exit_price <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_input(
                "exit_price",
                format!("must be positive, got {}", self.exit_price),
            ));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_input(
                "quantity",
                format!("must be positive, got {}", self.quantity),
            ));
        }
        for (field, fee) in [
            ("entry_fee", self.entry_fee),
            ("exit_fee", self.exit_fee),
            ("funding_fees", self.funding_fees),
        ] {
            if fee < Decimal::ZERO {
                return Err(AnalyticsError::invalid_input(
                    field,
                    format!("must not be negative, got {fee}"),
                ));
            }
        }
        Ok(())
    }
}

/// P&L facts for a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    /// Profit or loss before fees.
    pub gross_pnl: Decimal,
    /// Entry + exit + funding fees.
    pub total_fees: Decimal,
    /// Profit or loss after fees.
    pub net_pnl: Decimal,
    /// Capital base used for the percentage return.
    pub capital_at_risk: Decimal,
    /// Net return on capital at risk, in percent.
    pub pnl_percentage: Decimal,
}

/// Calculate gross/net P&L and percentage return.
///
/// Under [`ReturnBasis::Margin`] the capital base is `entry * quantity /
/// max(leverage, 1)`; under [`ReturnBasis::Notional`] leverage is ignored.
///
/// # Errors
///
/// Returns `InvalidTradeInput` for non-positive prices or quantity, negative
/// fees, or magnitudes whose products leave the decimal range.
pub fn calculate_pnl(input: &PnlInput, basis: ReturnBasis) -> AnalyticsResult<PnlBreakdown> {
    input.validate()?;

    // Both prices are positive, so the difference cannot overflow
    let delta = match input.direction {
        Direction::Long => input.exit_price - input.entry_price,
        Direction::Short => input.entry_price - input.exit_price,
    };

    let gross_pnl = delta
        .checked_mul(input.quantity)
        .ok_or_else(|| AnalyticsError::overflow("quantity", "price delta * quantity"))?;
    let total_fees = input
        .total_fees()
        .ok_or_else(|| AnalyticsError::overflow("funding_fees", "fee total"))?;
    let net_pnl = gross_pnl
        .checked_sub(total_fees)
        .ok_or_else(|| AnalyticsError::overflow("funding_fees", "gross P&L - fees"))?;

    let notional = input
        .entry_price
        .checked_mul(input.quantity)
        .ok_or_else(|| AnalyticsError::overflow("quantity", "entry_price * quantity"))?;
    let capital_at_risk = match basis {
        ReturnBasis::Margin => notional / input.leverage.max(Decimal::ONE),
        ReturnBasis::Notional => notional,
    };

    let pnl_percentage = if capital_at_risk > Decimal::ZERO {
        net_pnl
            .checked_div(capital_at_risk)
            .and_then(|r| r.checked_mul(HUNDRED))
            .ok_or_else(|| AnalyticsError::overflow("entry_price", "percentage return"))?
    } else {
        Decimal::ZERO
    };

    Ok(PnlBreakdown {
        gross_pnl,
        total_fees,
        net_pnl,
        capital_at_risk,
        pnl_percentage,
    })
}
