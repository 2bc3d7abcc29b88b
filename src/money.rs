use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use std::fmt::{Debug, Display};

/// Rounds `amount` to 2 decimal places, halves away from zero.
///
/// The exact binary value of `amount` is rounded, so `0.015`, which is
/// stored as slightly less than 0.015, rounds down. Amounts too small for a
/// [`Decimal`] round to zero; amounts too large for one, and NaN or infinite
/// amounts, are returned unchanged.
///
/// # Examples
///
/// ```
/// # use sellers::money::round2;
/// assert_eq!(round2(10.456), 10.46);
/// assert_eq!(round2(-0.125), -0.13);
/// assert_eq!(round2(0.015), 0.01);
/// ```
#[must_use]
pub fn round2(amount: f64) -> f64 {
    Decimal::from_f64_retain(amount)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| {
            if amount.is_finite() && amount.abs() < 1.0 {
                0.0
            } else {
                amount
            }
        })
}

/// Represents an amount of money in dollars, for display.
///
/// The [`Display`] implementation right-aligns the amount to 2 decimal places,
/// so that columns of amounts line up in the text report.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Usd(pub f64);

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>12.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_fn_rounds_to_cents() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn round2_fn_rounds_the_stored_value_not_the_decimal_literal() {
        let cases = [
            (0.015, 0.01),
            (1.005, 1.0),
            (0.205, 0.2),
            (2.675, 2.67),
            (0.125, 0.13),
            (0.375, 0.38),
            (-0.015, -0.01),
            (1.0e21, 1.0e21),
            (1.0e-30, 0.0),
        ];
        for (amount, want) in cases {
            assert_eq!(round2(amount), want, "round2({amount})");
        }
    }

    #[test]
    fn round2_fn_leaves_non_finite_amounts_alone() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
        assert_eq!(round2(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn round2_fn_rounds_negative_amounts_away_from_zero() {
        assert_eq!(round2(-2.346), -2.35);
        assert_eq!(round2(-2.344), -2.34);
    }

    #[test]
    fn usd_display_right_aligns_to_two_places() {
        assert_eq!(Usd(3.5).to_string(), "        3.50");
        assert_eq!(Usd(-1234.567).to_string(), "    -1234.57");
    }
}
