// 🔢 Decimal rounding for display values
//
// Binary floats cannot round-trip "42.45" exactly, so rounding straight on the f64
// gives answers that disagree with what a person reads on screen. Every value is
// converted through its shortest decimal representation (what `{}` prints) and
// rounded there, half away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round `value` to `dp` decimal places, half away from zero.
///
/// Returns `None` for non-finite input, or when `Decimal` cannot carry the value
/// with exactly `dp` fractional digits (28 significant digits at most).
pub fn round_half_away(value: f64, dp: u32) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }

    let exact = Decimal::from_str(&value.to_string()).ok()?;
    let mut rounded = exact.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);

    // "-0.00" never reaches the screen
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    rounded.rescale(dp);
    if rounded.scale() != dp {
        return None;
    }
    Some(rounded)
}

/// Fixed-point string with exactly `dp` fractional digits ("-1234.50").
///
/// Falls back to plain string formatting when the value does not fit in a `Decimal`.
pub fn to_fixed(value: f64, dp: u32) -> String {
    match round_half_away(value, dp) {
        Some(d) => d.to_string(),
        None => fallback_fixed(value, dp),
    }
}

/// Pad the shortest decimal form with zeros; only round (as a float) when it
/// carries more than `dp` fractional digits.
fn fallback_fixed(value: f64, dp: u32) -> String {
    let dp = dp as usize;
    let shortest = value.to_string();

    let fixed = match shortest.split_once('.') {
        None if dp == 0 => shortest,
        None => format!("{}.{}", shortest, "0".repeat(dp)),
        Some((_, frac)) if frac.len() <= dp => {
            format!("{}{}", shortest, "0".repeat(dp - frac.len()))
        }
        Some(_) => format!("{:.*}", dp, value),
    };

    match fixed.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => fixed,
    }
}

/// Round to `dp` places and hand back an `f64` (used for derived metrics).
pub fn round_to_f64(value: f64, dp: u32) -> f64 {
    round_half_away(value, dp)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_pads_fraction() {
        assert_eq!(to_fixed(1234.5, 2), "1234.50");
        assert_eq!(to_fixed(7.0, 2), "7.00");
        assert_eq!(to_fixed(7.0, 0), "7");
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(to_fixed(42.45, 1), "42.5");
        assert_eq!(to_fixed(-42.45, 1), "-42.5");
        assert_eq!(to_fixed(1.005, 2), "1.01");
        assert_eq!(to_fixed(2.5, 0), "3");
    }

    #[test]
    fn test_below_half_rounds_down() {
        assert_eq!(to_fixed(42.449, 1), "42.4");
        assert_eq!(to_fixed(42.44999999, 1), "42.4");
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(to_fixed(-0.001, 2), "0.00");
        assert_eq!(to_fixed(-0.0, 1), "0.0");
    }

    #[test]
    fn test_non_finite_has_no_decimal() {
        assert!(round_half_away(f64::NAN, 2).is_none());
        assert!(round_half_away(f64::INFINITY, 2).is_none());
    }

    #[test]
    fn test_huge_values_fall_back_to_float_formatting() {
        assert!(round_half_away(1e30, 2).is_none());
        assert_eq!(to_fixed(1e30, 2), format!("1{}.00", "0".repeat(30)));
    }

    #[test]
    fn test_scale_that_does_not_fit_falls_back() {
        // 28 integer digits leave no room for two decimals
        assert!(round_half_away(1e27, 2).is_none());
        assert_eq!(to_fixed(1e27, 2), format!("1{}.00", "0".repeat(27)));
        assert_eq!(to_fixed(5e28, 2), format!("5{}.00", "0".repeat(28)));
        assert_eq!(to_fixed(1e20, 10), format!("1{}.{}", "0".repeat(20), "0".repeat(10)));
    }

    #[test]
    fn test_more_decimals_than_decimal_holds() {
        assert!(round_half_away(1.5, 30).is_none());
        assert_eq!(to_fixed(1.5, 30), format!("1.5{}", "0".repeat(29)));
        assert_eq!(to_fixed(-1e-40, 30), format!("0.{}", "0".repeat(30)));
    }

    #[test]
    fn test_round_to_f64() {
        assert_eq!(round_to_f64(33.333333, 1), 33.3);
        assert_eq!(round_to_f64(66.66666, 1), 66.7);
    }
}
