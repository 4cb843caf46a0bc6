//! Statistical helpers over `Decimal` samples.

use rust_decimal::Decimal;

use super::constants::{SQRT_MAX_ITERATIONS, TOLERANCE, TWO};
use crate::config::DeviationMode;

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Arithmetic mean; `None` for an empty slice or on overflow.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values.iter().copied())?.checked_div(Decimal::from(values.len() as u64))
}

/// Standard deviation.
///
/// `Sample` divides by `n - 1` and needs at least two values; `Population`
/// divides by `n`. Both return `None` below two values so the ratio guards
/// agree across modes, and `None` when a squared deviation overflows.
pub fn std_dev(values: &[Decimal], mode: DeviationMode) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let squares = values
        .iter()
        .map(|v| {
            let deviation = v.checked_sub(avg)?;
            deviation.checked_mul(deviation)
        })
        .collect::<Option<Vec<Decimal>>>()?;
    let variance_sum = checked_sum(squares)?;
    let divisor = match mode {
        DeviationMode::Sample => values.len() - 1,
        DeviationMode::Population => values.len(),
    };

    sqrt_decimal(variance_sum / Decimal::from(divisor as u64))
}

/// Downside deviation: `sqrt(sum(min(r, 0)^2) / n)` over all `n` samples.
///
/// `Some(0)` when no sample is negative; `None` on overflow.
pub fn downside_deviation(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let squares = values
        .iter()
        .filter(|v| **v < Decimal::ZERO)
        .map(|v| v.checked_mul(*v))
        .collect::<Option<Vec<Decimal>>>()?;

    sqrt_decimal(checked_sum(squares)? / Decimal::from(values.len() as u64))
}

/// Square root by Newton's method; `None` for negative input.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = if value > Decimal::ONE { value / TWO } else { Decimal::ONE };

    for _ in 0..SQRT_MAX_ITERATIONS {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000001)
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[dec!(10), dec!(20), dec!(30), dec!(40)]), Some(dec!(25)));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev_modes() {
        let values = [dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];

        let Some(population) = std_dev(&values, DeviationMode::Population) else {
            panic!("population std_dev should succeed");
        };
        assert!(close(population, dec!(2)));

        let Some(sample) = std_dev(&values, DeviationMode::Sample) else {
            panic!("sample std_dev should succeed");
        };
        // sqrt(32 / 7)
        assert!(close(sample, dec!(2.138089935)));
    }

    #[test]
    fn test_std_dev_needs_two_values() {
        assert_eq!(std_dev(&[dec!(5)], DeviationMode::Sample), None);
        assert_eq!(std_dev(&[dec!(5)], DeviationMode::Population), None);
    }

    #[test]
    fn test_std_dev_constant_series_is_zero() {
        assert_eq!(
            std_dev(&[dec!(3), dec!(3), dec!(3)], DeviationMode::Sample),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_downside_deviation_uses_total_count() {
        // negatives: -2, -4 -> (4 + 16) / 4 = 5
        let Some(dd) = downside_deviation(&[dec!(3), dec!(-2), dec!(1), dec!(-4)]) else {
            panic!("downside deviation should succeed");
        };
        assert!(close(dd, dec!(2.236067977)));
    }

    #[test]
    fn test_downside_deviation_without_losses() {
        assert_eq!(downside_deviation(&[dec!(1), dec!(2)]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_overflow_yields_none() {
        let huge = dec!(999999999999999900);
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
        assert_eq!(mean(&[Decimal::MAX, Decimal::MAX]), None);
        // Squared deviation of ~5e17 exceeds the decimal range
        assert_eq!(std_dev(&[huge, dec!(-99.99)], DeviationMode::Sample), None);
        assert_eq!(downside_deviation(&[-huge, dec!(-1)]), None);
    }

    #[test]
    fn test_sqrt() {
        let Some(sqrt4) = sqrt_decimal(dec!(4)) else {
            panic!("sqrt of 4 should succeed");
        };
        assert!(close(sqrt4, dec!(2)));

        let Some(small) = sqrt_decimal(dec!(0.0004)) else {
            panic!("sqrt of 0.0004 should succeed");
        };
        assert!(close(small, dec!(0.02)));

        assert_eq!(sqrt_decimal(dec!(-1)), None);
    }
}
