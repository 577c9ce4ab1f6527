use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Used as a clap value parser, so empty input is an error rather than zero.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a dollar amount as whole dollars with thousands separators.
///
/// Halves round to the nearest even dollar. Negative amounts carry the sign
/// before the dollar sign.
///
/// ```
/// use margin_ui::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(3225000.00)), "$3,225,000");
/// assert_eq!(format_currency(dec!(-900000)), "-$900,000");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Formats an improvement range as `"$low to $high"`.
pub fn format_range(
    low: Decimal,
    high: Decimal,
) -> String {
    format!("{} to {}", format_currency(low), format_currency(high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  0.15  ").unwrap(), dec!(0.15));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(7350000)), "$7,350,000");
        assert_eq!(format_currency(dec!(100000)), "$100,000");
        assert_eq!(format_currency(dec!(999)), "$999");
    }

    #[test]
    fn format_currency_drops_cents() {
        assert_eq!(format_currency(dec!(59535.71)), "$59,536");
        assert_eq!(format_currency(dec!(1234.49)), "$1,234");
    }

    #[test]
    fn format_currency_rounds_halves_to_even() {
        assert_eq!(format_currency(dec!(2.5)), "$2");
        assert_eq!(format_currency(dec!(3.5)), "$4");
    }

    #[test]
    fn format_currency_handles_negative_and_zero() {
        assert_eq!(format_currency(dec!(-66712500)), "-$66,712,500");
        assert_eq!(format_currency(dec!(0)), "$0");
        assert_eq!(format_currency(dec!(-0.4)), "$0");
    }

    #[test]
    fn format_range_joins_bounds() {
        assert_eq!(
            format_range(dec!(3225000), dec!(7350000)),
            "$3,225,000 to $7,350,000"
        );
    }
}
