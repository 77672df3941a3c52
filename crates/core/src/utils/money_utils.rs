use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Converts a major-unit amount entered as free text into minor units.
///
/// This is the single source of truth for turning keypad input into cents.
/// Everything except digits and the decimal point is stripped before
/// parsing, sub-cent precision is truncated rather than rounded, and
/// negative amounts clamp to zero.
///
/// Returns `None` when the remaining text does not parse as a number.
pub fn text_to_minor_units(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let major = Decimal::from_str(&cleaned).ok()?;
    let major = major.max(Decimal::ZERO);
    (major * Decimal::ONE_HUNDRED).trunc().to_i64()
}

/// Formats minor units for on-screen display.
///
/// Whole amounts drop the fractional part: `$20 CAD` rather than
/// `$20.00 CAD`; fractional amounts keep two digits: `$12.50 CAD`.
pub fn format_minor_units(cents: i64, currency: &str) -> String {
    if cents % 100 == 0 {
        format!("${} {}", cents / 100, currency)
    } else {
        format!("${}.{:02} {}", cents / 100, (cents % 100).abs(), currency)
    }
}
