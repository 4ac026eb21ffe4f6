//! Syntax-independent parts of literal formatting.
//!
//! The target syntax decides prefixes, suffixes and escaping; the digits are decided here.

use crate::config::NumberFormat;

/// Returns true for a magnitude made of one significant digit followed by zeros (`300`, `5`)
#[must_use]
pub fn is_round(magnitude: u128) -> bool {
    let mut value = magnitude;
    while value >= 10 && value % 10 == 0 {
        value /= 10;
    }
    value < 10
}

/// Returns true if an integer of `magnitude` is written in decimal under `format`.
///
/// `Auto` keeps small numbers (below 16) and round numbers below 1000 in decimal and switches
/// to hexadecimal for everything else, which is what bit masks and flags usually look like.
#[must_use]
pub fn prefers_decimal(magnitude: u128, format: NumberFormat) -> bool {
    match format {
        NumberFormat::Decimal => true,
        NumberFormat::Hexadecimal => false,
        NumberFormat::Auto => magnitude < 16 || (magnitude < 1000 && is_round(magnitude)),
    }
}

/// Digits of an integer literal, with `hex_prefix` when written in hexadecimal.
///
/// Negative values keep their sign in front of the prefix (`-0x1388`).
#[must_use]
pub fn format_integer(value: i128, format: NumberFormat, hex_prefix: &str) -> String {
    let magnitude = value.unsigned_abs();
    let sign = if value < 0 { "-" } else { "" };

    if prefers_decimal(magnitude, format) {
        format!("{sign}{magnitude}")
    } else {
        format!("{sign}{hex_prefix}{magnitude:X}")
    }
}

/// Decimal text of a finite floating point value, always with a fraction or exponent
#[must_use]
pub fn format_float(value: f64) -> String {
    // Debug keeps the shortest round-trip digits and always writes `.0` or an exponent
    format!("{value:?}")
}

/// Decimal text of a finite single precision value
#[must_use]
pub fn format_single(value: f32) -> String {
    format!("{value:?}")
}

/// Name of the static member spelling a non-finite value (`NaN`, `PositiveInfinity`, ...)
#[must_use]
pub fn non_finite_member(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() && value > 0.0 {
        Some("PositiveInfinity")
    } else if value.is_infinite() {
        Some("NegativeInfinity")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_number_format() {
        let auto = |value| format_integer(value, NumberFormat::Auto, "0x");
        assert_eq!(auto(5), "5");
        assert_eq!(auto(240), "0xF0");
        assert_eq!(auto(100), "100");
        assert_eq!(auto(300), "300");
        assert_eq!(auto(5000), "0x1388");
        assert_eq!(auto(15), "15");
        assert_eq!(auto(16), "0x10");
        assert_eq!(auto(0), "0");
        assert_eq!(auto(-1), "-1");
        assert_eq!(auto(-5000), "-0x1388");
    }

    #[test]
    fn test_forced_formats() {
        assert_eq!(format_integer(5000, NumberFormat::Decimal, "0x"), "5000");
        assert_eq!(format_integer(5, NumberFormat::Hexadecimal, "0x"), "0x5");
        assert_eq!(format_integer(255, NumberFormat::Hexadecimal, "&H"), "&HFF");
    }

    #[test]
    fn test_round() {
        assert!(is_round(0));
        assert!(is_round(7));
        assert!(is_round(900));
        assert!(!is_round(110));
        assert!(!is_round(999));
    }

    #[test]
    fn test_float_text() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_single(2.5), "2.5");
        assert_eq!(non_finite_member(f64::NAN), Some("NaN"));
        assert_eq!(non_finite_member(f64::NEG_INFINITY), Some("NegativeInfinity"));
        assert_eq!(non_finite_member(1.0), None);
    }
}
