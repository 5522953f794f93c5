//! Number formatting for axes and data labels.
//!
//! - [`RangeFormatter`]: one unit (K/M/B) for a whole axis, chosen from the value range
//! - [`format_value`]: per-label unit chosen from each value's own magnitude

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::stats::numeric_extent;

/// Display unit with its divisor and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueUnit {
    Plain,
    Thousands,
    Millions,
    Billions,
}

impl ValueUnit {
    /// Largest unit whose threshold `magnitude` exceeds.
    pub fn for_magnitude(magnitude: f64) -> Self {
        let m = magnitude.abs();
        if m > 1.0e9 {
            ValueUnit::Billions
        } else if m > 1.0e6 {
            ValueUnit::Millions
        } else if m > 1.0e3 {
            ValueUnit::Thousands
        } else {
            ValueUnit::Plain
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            ValueUnit::Plain => 1.0,
            ValueUnit::Thousands => 1.0e3,
            ValueUnit::Millions => 1.0e6,
            ValueUnit::Billions => 1.0e9,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ValueUnit::Plain => "",
            ValueUnit::Thousands => "K",
            ValueUnit::Millions => "M",
            ValueUnit::Billions => "B",
        }
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Two decimals with locale digit grouping, e.g. `12,345.60` (en) or `12.345,60` (de).
fn format_fixed2_locale(v: f64, locale: &Locale, dec_sep: char) -> String {
    let s = format!("{:.2}", v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let grouped = match int_part.parse::<u64>() {
        Ok(i) => i.to_formatted_string(locale),
        Err(_) => int_part.to_string(),
    };
    let sign = if v < 0.0 && s.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{dec_sep}{frac_part}")
}

/// Formats every value on an axis in the same unit.
#[derive(Debug, Clone, Copy)]
pub struct RangeFormatter {
    unit: ValueUnit,
    locale: Option<(&'static Locale, char)>,
}

impl RangeFormatter {
    pub fn new(unit: ValueUnit) -> Self {
        Self { unit, locale: None }
    }

    /// Unit chosen from `max - min`.
    pub fn for_range(min: f64, max: f64) -> Self {
        Self::new(ValueUnit::for_magnitude(max - min))
    }

    /// Unit chosen from the numeric range of `field`; plain when the field has no numbers.
    pub fn for_field(records: &[Record], field: &str) -> Self {
        match numeric_extent(records, field) {
            Some(e) => Self::for_range(e.min, e.max),
            None => {
                log::debug!("no numeric values in `{field}`; using plain formatting");
                Self::new(ValueUnit::Plain)
            }
        }
    }

    /// Group digits and pick the decimal separator for a locale tag (`en`, `de`, ...).
    pub fn with_locale(mut self, tag: &str) -> Self {
        self.locale = Some(map_locale(tag));
        self
    }

    pub fn unit(&self) -> ValueUnit {
        self.unit
    }

    pub fn format(&self, v: f64) -> String {
        let scaled = v / self.unit.divisor();
        let body = match self.locale {
            Some((locale, sep)) => format_fixed2_locale(scaled, locale, sep),
            None => format!("{scaled:.2}"),
        };
        format!("{body}{}", self.unit.suffix())
    }
}

/// Shortest general-format rendering with 6 significant digits.
///
/// Trailing zeros are trimmed; exponent form (`1.5e+7`) is used outside `1e-6 <= |v| < 1e6`.
pub fn format_general(v: f64) -> String {
    const PRECISION: i32 = 6;
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }

    // Exponent after rounding to PRECISION significant digits.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -6 || exp >= PRECISION {
        let m = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{m}e{sign}{}", exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Data-label formatting: each value picks its own unit.
pub fn format_value(v: f64) -> String {
    let unit = ValueUnit::for_magnitude(v);
    format!("{}{}", format_general(v / unit.divisor()), unit.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_unit_applies_to_small_values() {
        let f = RangeFormatter::for_range(950.0, 2_600_000.0);
        assert_eq!(f.unit(), ValueUnit::Millions);
        assert_eq!(f.format(950.0), "0.00M");
        assert_eq!(f.format(2_600_000.0), "2.60M");
    }

    #[test]
    fn unit_applies_only_above_threshold() {
        assert_eq!(RangeFormatter::for_range(0.0, 1000.0).format(1000.0), "1000.00");
        assert_eq!(RangeFormatter::for_range(0.0, 1000.5).format(1000.5), "1.00K");
        assert_eq!(ValueUnit::for_magnitude(1.0e6), ValueUnit::Thousands);
        assert_eq!(ValueUnit::for_magnitude(-1.0e9), ValueUnit::Millions);
        assert_eq!(format_value(1000.0), "1000");
    }

    #[test]
    fn plain_range_keeps_two_decimals() {
        let f = RangeFormatter::for_range(1.0, 12.0);
        assert_eq!(f.format(3.14159), "3.14");
        assert_eq!(f.format(7.0), "7.00");
    }

    #[test]
    fn locale_grouping() {
        let f = RangeFormatter::new(ValueUnit::Plain).with_locale("de");
        assert_eq!(f.format(12345.6), "12.345,60");
        let f = RangeFormatter::new(ValueUnit::Plain).with_locale("en");
        assert_eq!(f.format(-12345.6), "-12,345.60");
    }

    #[test]
    fn general_format() {
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(1234.5), "1234.5");
        assert_eq!(format_general(0.000123), "0.000123");
        assert_eq!(format_general(123456789.0), "1.23457e+8");
        assert_eq!(format_general(1.0 / 3.0), "0.333333");
        assert_eq!(format_general(-42.0), "-42");
    }

    #[test]
    fn per_value_suffixes() {
        assert_eq!(format_value(950.0), "950");
        assert_eq!(format_value(2_600_000.0), "2.6M");
        assert_eq!(format_value(1_500.0), "1.5K");
        assert_eq!(format_value(3_000_000_000.0), "3B");
        assert_eq!(format_value(-2_000.0), "-2K");
    }
}
