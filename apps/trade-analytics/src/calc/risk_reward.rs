//! Planned risk and reward from stop-loss and take-profit levels.
//!
//! Risk and reward are price distances from entry. Currency amounts are
//! distance × quantity and are produced by [`RiskReward::scaled`] at the call
//! site that knows the quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::trade::Direction;

/// Whether stop and target sit on the expected sides of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelPlacement {
    /// Long: stop < entry < target. Short: target < entry < stop.
    Expected,
    /// Any other arrangement. Allowed, but logged.
    Contrarian,
}

/// Why no risk:reward could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UndefinedRiskReward {
    /// Stop-loss or take-profit not set.
    MissingLevels,
    /// Stop-loss equals entry price.
    ZeroRiskDistance {
        /// Distance from entry to target.
        reward_distance: Decimal,
    },
}

/// A defined risk:reward in price-distance terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReward {
    /// `|entry - stop_loss|`.
    pub risk_distance: Decimal,
    /// `|take_profit - entry|`.
    pub reward_distance: Decimal,
    /// `reward_distance / risk_distance`.
    pub ratio: Decimal,
    /// Level placement relative to direction.
    pub placement: LevelPlacement,
}

impl RiskReward {
    /// Express the distances in currency for a position of `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` if an amount leaves the decimal range.
    pub fn scaled(&self, quantity: Decimal) -> AnalyticsResult<TradeRiskReward> {
        Ok(TradeRiskReward {
            risk_amount: scale_distance(self.risk_distance, quantity)?,
            reward_amount: scale_distance(self.reward_distance, quantity)?,
            ratio: Some(self.ratio),
        })
    }
}

fn scale_distance(distance: Decimal, quantity: Decimal) -> AnalyticsResult<Decimal> {
    distance
        .checked_mul(quantity)
        .ok_or_else(|| AnalyticsError::overflow("quantity", "level distance * quantity"))
}

/// Result of the risk:reward calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskRewardOutcome {
    /// Both levels set and risk distance non-zero.
    Defined(RiskReward),
    /// No ratio exists; distinguishable from a zero ratio.
    Undefined(UndefinedRiskReward),
}

impl RiskRewardOutcome {
    /// The ratio, if defined.
    #[must_use]
    pub const fn ratio(&self) -> Option<Decimal> {
        match self {
            Self::Defined(rr) => Some(rr.ratio),
            Self::Undefined(_) => None,
        }
    }

    /// Currency amounts for a position of `quantity` units.
    ///
    /// `None` when either level is missing. A zero risk distance keeps the
    /// amounts but has no ratio.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTradeInput` if an amount leaves the decimal range.
    pub fn scaled(&self, quantity: Decimal) -> AnalyticsResult<Option<TradeRiskReward>> {
        match self {
            Self::Defined(rr) => rr.scaled(quantity).map(Some),
            Self::Undefined(UndefinedRiskReward::ZeroRiskDistance { reward_distance }) => {
                Ok(Some(TradeRiskReward {
                    risk_amount: Decimal::ZERO,
                    reward_amount: scale_distance(*reward_distance, quantity)?,
                    ratio: None,
                }))
            }
            Self::Undefined(UndefinedRiskReward::MissingLevels) => Ok(None),
        }
    }
}

/// Risk:reward stored on an enriched trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRiskReward {
    /// Currency at risk to the stop.
    pub risk_amount: Decimal,
    /// Currency to gain at the target.
    pub reward_amount: Decimal,
    /// Reward / risk; `None` when risk is zero.
    pub ratio: Option<Decimal>,
}

/// Classify stop/target placement for a direction.
#[must_use]
pub fn level_placement(
    entry_price: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
    direction: Direction,
) -> LevelPlacement {
    let expected = match direction {
        Direction::Long => stop_loss < entry_price && entry_price < take_profit,
        Direction::Short => take_profit < entry_price && entry_price < stop_loss,
    };
    if expected {
        LevelPlacement::Expected
    } else {
        LevelPlacement::Contrarian
    }
}

/// Calculate planned risk:reward.
///
/// # Errors
///
/// Returns `InvalidTradeInput` if the entry price or a supplied level is not
/// positive.
pub fn calculate_risk_reward(
    entry_price: Decimal,
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
    direction: Direction,
) -> AnalyticsResult<RiskRewardOutcome> {
    if entry_price <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input(
            "entry_price",
            format!("must be positive, got {entry_price}"),
        ));
    }
    for (field, level) in [("stop_loss", stop_loss), ("take_profit", take_profit)] {
        match level {
            Some(level) if level <= Decimal::ZERO => {
                return Err(AnalyticsError::invalid_input(
                    field,
                    format!("must be positive, got {level}"),
                ));
            }
            _ => {}
        }
    }

    let (Some(stop_loss), Some(take_profit)) = (stop_loss, take_profit) else {
        return Ok(RiskRewardOutcome::Undefined(UndefinedRiskReward::MissingLevels));
    };

    let risk_distance = (entry_price - stop_loss).abs();
    let reward_distance = (take_profit - entry_price).abs();

    let placement = level_placement(entry_price, stop_loss, take_profit, direction);
    if placement == LevelPlacement::Contrarian {
        warn!(
            ?direction,
            %entry_price,
            %stop_loss,
            %take_profit,
            "Stop/target placed on unexpected side of entry"
        );
    }

    if risk_distance == Decimal::ZERO {
        return Ok(RiskRewardOutcome::Undefined(
            UndefinedRiskReward::ZeroRiskDistance { reward_distance },
        ));
    }

    let ratio = reward_distance
        .checked_div(risk_distance)
        .ok_or_else(|| AnalyticsError::overflow("stop_loss", "reward / risk"))?;

    Ok(RiskRewardOutcome::Defined(RiskReward {
        risk_distance,
        reward_distance,
        ratio,
        placement,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_long_three_to_one() {
        let outcome =
            calculate_risk_reward(dec!(100), Some(dec!(95)), Some(dec!(115)), Direction::Long)
                .unwrap();

        let RiskRewardOutcome::Defined(rr) = outcome else {
            panic!("ratio should be defined");
        };
        assert_eq!(rr.risk_distance, dec!(5));
        assert_eq!(rr.reward_distance, dec!(15));
        assert_eq!(rr.ratio, dec!(3));
        assert_eq!(rr.placement, LevelPlacement::Expected);
    }

    #[test]
    fn test_short_expected_placement() {
        let outcome =
            calculate_risk_reward(dec!(50), Some(dec!(52)), Some(dec!(45)), Direction::Short)
                .unwrap();
        let RiskRewardOutcome::Defined(rr) = outcome else {
            panic!("ratio should be defined");
        };
        assert_eq!(rr.ratio, dec!(2.5));
        assert_eq!(rr.placement, LevelPlacement::Expected);
    }

    #[test]
    fn test_contrarian_levels_still_defined() {
        // Long with stop above entry
        let outcome =
            calculate_risk_reward(dec!(100), Some(dec!(105)), Some(dec!(110)), Direction::Long)
                .unwrap();
        let RiskRewardOutcome::Defined(rr) = outcome else {
            panic!("ratio should be defined");
        };
        assert_eq!(rr.placement, LevelPlacement::Contrarian);
        assert_eq!(rr.ratio, dec!(2));
    }

    #[test]
    fn test_missing_levels_undefined() {
        let outcome = calculate_risk_reward(dec!(100), Some(dec!(95)), None, Direction::Long)
            .unwrap();
        assert_eq!(
            outcome,
            RiskRewardOutcome::Undefined(UndefinedRiskReward::MissingLevels)
        );
        assert_eq!(outcome.ratio(), None);
        assert_eq!(outcome.scaled(dec!(10)).unwrap(), None);
    }

    #[test]
    fn test_zero_risk_distance_has_no_ratio() {
        let outcome =
            calculate_risk_reward(dec!(100), Some(dec!(100)), Some(dec!(120)), Direction::Long)
                .unwrap();
        assert_eq!(outcome.ratio(), None);

        let Some(amounts) = outcome.scaled(dec!(2)).unwrap() else {
            panic!("amounts should exist when both levels are set");
        };
        assert_eq!(amounts.risk_amount, Decimal::ZERO);
        assert_eq!(amounts.reward_amount, dec!(40));
        assert_eq!(amounts.ratio, None);
    }

    #[test]
    fn test_scaled_by_quantity() {
        let outcome =
            calculate_risk_reward(dec!(100), Some(dec!(95)), Some(dec!(115)), Direction::Long)
                .unwrap();
        let Some(amounts) = outcome.scaled(dec!(10)).unwrap() else {
            panic!("amounts should exist");
        };
        assert_eq!(amounts.risk_amount, dec!(50));
        assert_eq!(amounts.reward_amount, dec!(150));
        assert_eq!(amounts.ratio, Some(dec!(3)));
    }

    #[test]
    fn test_scaled_overflow_rejected() {
        let outcome = calculate_risk_reward(
            dec!(1000000000000000),
            Some(dec!(1)),
            Some(dec!(2000000000000000)),
            Direction::Long,
        )
        .unwrap();
        let err = outcome.scaled(dec!(1000000000000000)).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_ratio_overflow_rejected() {
        // Risk of 1e-28 against a reward near 1e28
        let err = calculate_risk_reward(
            dec!(0.0000000000000000000000000001),
            Some(dec!(0.0000000000000000000000000002)),
            Some(dec!(10000000000000000000000000000)),
            Direction::Short,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reward / risk"));
    }

    #[test]
    fn test_non_positive_level_rejected() {
        let err = calculate_risk_reward(dec!(100), Some(dec!(0)), Some(dec!(110)), Direction::Long)
            .unwrap_err();
        assert!(err.to_string().contains("stop_loss"));
    }
}
