//! Locale-aware number rendering for user-facing messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of fraction digits kept when rendering a number.
const MAX_FRACTION_DIGITS: usize = 3;

/// Extra digits printed past the rounding position to tell an exact tie
/// from a value just above or below it.
const TIE_GUARD_DIGITS: usize = 30;

/// Supported number-formatting locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// `1,234.5`
    #[default]
    EnUs,
    /// `1.234,5`
    DeDe,
    /// `1 234,5` (narrow no-break space)
    FrFr,
}

impl Locale {
    /// BCP 47 tag for this locale.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
        }
    }

    const fn group_separator(self) -> &'static str {
        match self {
            Self::EnUs => ",",
            Self::DeDe => ".",
            Self::FrFr => "\u{202f}",
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::EnUs => '.',
            Self::DeDe | Self::FrFr => ',',
        }
    }

    /// Renders a number with thousands grouping and at most three fraction
    /// digits, trailing zeros trimmed.
    ///
    /// Values that round to zero render without a sign.
    #[must_use]
    pub fn format_number(self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let symbol = if value < 0.0 { "-∞" } else { "∞" };
            return symbol.to_string();
        }

        let rounded = round_half_away(value.abs(), MAX_FRACTION_DIGITS);
        let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
        let frac_part = frac_part.trim_end_matches('0');

        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();

        let mut output = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
        if value < 0.0 && !is_zero {
            output.push('-');
        }
        push_grouped(&mut output, int_part, self.group_separator());
        if !frac_part.is_empty() {
            output.push(self.decimal_separator());
            output.push_str(frac_part);
        }
        output
    }
}

/// Renders `value` with exactly `digits` fraction digits, rounding ties away
/// from zero, without grouping and with a `.` decimal point.
///
/// Negative values keep their sign even when they round to zero (`-0.0`).
pub fn format_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let symbol = if value < 0.0 { "-Infinity" } else { "Infinity" };
        return symbol.to_string();
    }

    let rounded = round_half_away(value.abs(), digits);
    if value < 0.0 {
        format!("-{rounded}")
    } else {
        rounded
    }
}

/// Fixed-point text of a non-negative finite `magnitude` rounded to `digits`
/// fraction digits, ties away from zero.
///
/// `{:.N}` formatting rounds exact ties to even, so ties are detected from the
/// exact decimal expansion and rounded up by hand.
fn round_half_away(magnitude: f64, digits: usize) -> String {
    let expanded = format!("{:.*}", digits + TIE_GUARD_DIGITS, magnitude);
    let (head, tail) = expanded.split_at(expanded.len() - TIE_GUARD_DIGITS);
    let is_tie = tail.starts_with('5') && tail.bytes().skip(1).all(|b| b == b'0');

    if !is_tie {
        return format!("{:.*}", digits, magnitude);
    }

    let head = head.trim_end_matches('.');
    increment_last_digit(head)
}

/// Adds one unit in the last place of a plain decimal string.
fn increment_last_digit(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        match *byte {
            b'.' => {}
            b'9' => *byte = b'0',
            _ => {
                *byte += 1;
                carry = false;
                break;
            }
        }
    }

    let mut output = String::with_capacity(bytes.len() + 1);
    if carry {
        output.push('1');
    }
    output.extend(bytes.into_iter().map(char::from));
    output
}

/// Appends `digits` to `output`, inserting `separator` between groups of three.
fn push_grouped(output: &mut String, digits: &str, separator: &str) {
    let len = digits.len();
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            output.push_str(separator);
        }
        output.push(digit);
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(Self::EnUs),
            "de" | "de-de" => Ok(Self::DeDe),
            "fr" | "fr-fr" => Ok(Self::FrFr),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unsupported locale tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_in_en_us() {
        let locale = Locale::EnUs;
        assert_eq!(locale.format_number(0.0), "0");
        assert_eq!(locale.format_number(90.0), "90");
        assert_eq!(locale.format_number(999.0), "999");
        assert_eq!(locale.format_number(1_000.0), "1,000");
        assert_eq!(locale.format_number(1_234_567.0), "1,234,567");
        assert_eq!(locale.format_number(-12_500.0), "-12,500");
    }

    #[test]
    fn keeps_at_most_three_fraction_digits() {
        let locale = Locale::EnUs;
        assert_eq!(locale.format_number(12.5), "12.5");
        assert_eq!(locale.format_number(33.333_333_333), "33.333");
        assert_eq!(locale.format_number(1_234.567_89), "1,234.568");
        assert_eq!(locale.format_number(2.000_4), "2");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        let locale = Locale::EnUs;
        assert_eq!(locale.format_number(1.0625), "1.063");
        assert_eq!(locale.format_number(-1.0625), "-1.063");
        assert_eq!(locale.format_number(0.9995), "1");
        assert_eq!(locale.format_number(999.9995), "1,000");
        // 1.0005 is stored just below the tie and rounds down.
        assert_eq!(locale.format_number(1.0005), "1");
    }

    #[test]
    fn fixed_rounds_ties_away_from_zero() {
        assert_eq!(format_fixed(12.25, 1), "12.3");
        assert_eq!(format_fixed(87.75, 1), "87.8");
        assert_eq!(format_fixed(0.25, 1), "0.3");
        assert_eq!(format_fixed(99.95, 1), "100.0");
        assert_eq!(format_fixed(2.5, 0), "3");
        assert_eq!(format_fixed(30.0, 1), "30.0");
        assert_eq!(format_fixed(-12.25, 1), "-12.3");
    }

    #[test]
    fn fixed_handles_non_finite_values() {
        assert_eq!(format_fixed(f64::NAN, 1), "NaN");
        assert_eq!(format_fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(format_fixed(f64::NEG_INFINITY, 1), "-Infinity");
    }

    #[test]
    fn negative_values_rounding_to_zero_have_no_sign() {
        assert_eq!(Locale::EnUs.format_number(-0.0), "0");
        assert_eq!(Locale::EnUs.format_number(-0.000_1), "0");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(Locale::EnUs.format_number(f64::NAN), "NaN");
        assert_eq!(Locale::EnUs.format_number(f64::INFINITY), "∞");
        assert_eq!(Locale::EnUs.format_number(f64::NEG_INFINITY), "-∞");
    }

    #[test]
    fn european_separators() {
        assert_eq!(Locale::DeDe.format_number(1_234_567.25), "1.234.567,25");
        assert_eq!(Locale::FrFr.format_number(1_234.5), "1\u{202f}234,5");
    }

    #[test]
    fn parses_tags_leniently() {
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::EnUs);
        assert_eq!("de_DE".parse::<Locale>().unwrap(), Locale::DeDe);
        assert_eq!(" fr ".parse::<Locale>().unwrap(), Locale::FrFr);
    }

    #[test]
    fn unknown_locale_errors() {
        let err = "xx-YY".parse::<Locale>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported locale: xx-YY");
    }

    #[test]
    fn serde_uses_bcp47_tag() {
        let json = serde_json::to_string(&Locale::DeDe).unwrap();
        assert_eq!(json, "\"de-DE\"");
        let parsed: Locale = serde_json::from_str("\"en-us\"").unwrap();
        assert_eq!(parsed, Locale::EnUs);
    }
}
