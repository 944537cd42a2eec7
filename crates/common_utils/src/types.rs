//! Types that can be used in other crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A monetary amount in minor currency units (integer cents).
///
/// Gateways bill in cents; the CRM collects amounts as free-form major-unit
/// strings. [`MinorUnit::from_major_unit_str`] performs the conversion the
/// gateway vocabulary requires.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// Wrap an amount already expressed in minor units.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw minor-unit amount.
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// Parse a caller-supplied major-unit amount string into minor units.
    ///
    /// Everything except ASCII digits and the first decimal point is
    /// stripped before conversion, and the result is `floor(amount * 100)`.
    /// The parse is deliberately lenient: an empty or fully non-numeric
    /// input converts to zero, matching how the CRM forms have historically
    /// been interpreted, and any digits past the second decimal place are
    /// truncated rather than rounded.
    pub fn from_major_unit_str(raw: &str) -> Self {
        let sanitized: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let (whole, fraction) = match sanitized.split_once('.') {
            Some((whole, rest)) => {
                // A second decimal point ends the number, as a float parse would.
                let fraction: String = rest.chars().take_while(char::is_ascii_digit).collect();
                (whole.to_string(), fraction)
            }
            None => (sanitized, String::new()),
        };

        let whole_part: i64 = whole.parse().unwrap_or(0);
        let cents_part: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.get(0..2).and_then(|s| s.parse().ok()).unwrap_or(0),
        };

        Self(whole_part * 100 + cents_part)
    }

    /// Convert back to major units for caller-facing reporting.
    #[allow(clippy::as_conversions)]
    pub fn to_major_unit(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_amount_converts_to_cents() {
        assert_eq!(MinorUnit::from_major_unit_str("10.00").get_amount_as_i64(), 1000);
        assert_eq!(MinorUnit::from_major_unit_str("10").get_amount_as_i64(), 1000);
        assert_eq!(MinorUnit::from_major_unit_str("0.99").get_amount_as_i64(), 99);
    }

    #[test]
    fn conversion_floors_instead_of_rounding() {
        assert_eq!(MinorUnit::from_major_unit_str("10.999").get_amount_as_i64(), 1099);
        assert_eq!(MinorUnit::from_major_unit_str("0.019").get_amount_as_i64(), 1);
    }

    #[test]
    fn non_numeric_characters_are_stripped_before_conversion() {
        assert_eq!(
            MinorUnit::from_major_unit_str("$1,234.56").get_amount_as_i64(),
            123456
        );
        assert_eq!(MinorUnit::from_major_unit_str("USD 5.25").get_amount_as_i64(), 525);
    }

    #[test]
    fn garbage_converts_to_zero() {
        assert_eq!(MinorUnit::from_major_unit_str("").get_amount_as_i64(), 0);
        assert_eq!(MinorUnit::from_major_unit_str("free").get_amount_as_i64(), 0);
    }

    #[test]
    fn second_decimal_point_ends_the_number() {
        assert_eq!(MinorUnit::from_major_unit_str("1.2.3").get_amount_as_i64(), 120);
    }

    #[test]
    fn single_fraction_digit_is_tens_of_cents() {
        assert_eq!(MinorUnit::from_major_unit_str("10.5").get_amount_as_i64(), 1050);
    }

    #[test]
    fn round_trips_to_major_units() {
        let amount = MinorUnit::from_major_unit_str("10.00");
        assert!((amount.to_major_unit() - 10.0).abs() < f64::EPSILON);
    }
}
