//! Outcome classification from net P&L.

use rust_decimal::Decimal;

use crate::trade::Outcome;

/// Classify a closed trade by its net P&L.
///
/// Never returns [`Outcome::Open`]; that state belongs to trades without an
/// exit and is assigned by the enricher.
#[must_use]
pub fn classify_outcome(net_pnl: Decimal) -> Outcome {
    if net_pnl > Decimal::ZERO {
        Outcome::Win
    } else if net_pnl < Decimal::ZERO {
        Outcome::Loss
    } else {
        Outcome::Breakeven
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify() {
        assert_eq!(classify_outcome(dec!(0.01)), Outcome::Win);
        assert_eq!(classify_outcome(dec!(-0.01)), Outcome::Loss);
        assert_eq!(classify_outcome(Decimal::ZERO), Outcome::Breakeven);
        // Scale does not matter
        assert_eq!(classify_outcome(dec!(0.000)), Outcome::Breakeven);
    }
}
