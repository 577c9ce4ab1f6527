//! Common helpers shared by the margin calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use margin_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a whole percentage (0-100) into a share between 0 and 1.
///
/// ```
/// use rust_decimal_macros::dec;
/// use margin_core::calculations::common::percent_to_share;
///
/// assert_eq!(percent_to_share(75), dec!(0.75));
/// ```
pub fn percent_to_share(pct: u8) -> Decimal {
    Decimal::from(pct) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(39500.004)), dec!(39500.00));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(70089.285)), dec!(70089.29));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-8250000.005)), dec!(-8250000.01));
    }

    #[test]
    fn round_half_up_handles_repeating_fractions() {
        // 75,000 / 7 patients
        let fee = dec!(75000) / dec!(7);

        assert_eq!(round_half_up(fee), dec!(10714.29));
    }

    #[test]
    fn round_half_up_preserves_whole_dollars() {
        assert_eq!(round_half_up(dec!(3225000)), dec!(3225000));
    }

    // =========================================================================
    // percent_to_share tests
    // =========================================================================

    #[test]
    fn percent_to_share_handles_bounds() {
        assert_eq!(percent_to_share(0), Decimal::ZERO);
        assert_eq!(percent_to_share(100), Decimal::ONE);
    }

    #[test]
    fn percent_to_share_is_exact() {
        assert_eq!(percent_to_share(33), dec!(0.33));
    }
}
