//! Adaptive date parsing and temporal filtering.
//!
//! Accepted shapes:
//! - a concrete date (returned unchanged)
//! - a number, read as a calendar year (January 1)
//! - `YYYY`, `YYYY-MM`, or `YYYY-MM-DD` strings (months are 1-based in the input)
//!
//! [`parse_date`] reports anything else as an error. The lenient variants
//! ([`parse_date_or`], [`parse_date_or_today`]) substitute a fallback date instead.

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::DateParseError;
use crate::models::{DateLike, Record};

fn year_only_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}$").expect("static regex"))
}

fn ymd(year: i64, month: i64, day: i64) -> Result<NaiveDate, DateParseError> {
    let out_of_range = DateParseError::OutOfRange { year, month, day };
    let (Ok(y), Ok(m), Ok(d)) = (
        i32::try_from(year),
        u32::try_from(month),
        u32::try_from(day),
    ) else {
        return Err(out_of_range);
    };
    NaiveDate::from_ymd_opt(y, m, d).ok_or(out_of_range)
}

fn component(part: &str, whole: &str) -> Result<i64, DateParseError> {
    part.trim()
        .parse::<i64>()
        .map_err(|_| DateParseError::NonNumeric(whole.to_string()))
}

/// Parse a date-like value into a calendar date.
pub fn parse_date(value: &DateLike) -> Result<NaiveDate, DateParseError> {
    match value {
        DateLike::Date(d) => Ok(*d),
        DateLike::Year(y) => ymd(*y, 1, 1),
        DateLike::Text(s) => {
            let parts: Vec<&str> = s.split('-').collect();
            match parts.as_slice() {
                [y, m, d] => ymd(component(y, s)?, component(m, s)?, component(d, s)?),
                [y, m] => ymd(component(y, s)?, component(m, s)?, 1),
                [y] if year_only_re().is_match(y) => ymd(component(y, s)?, 1, 1),
                _ => Err(DateParseError::UnrecognizedFormat(s.clone())),
            }
        }
        DateLike::Other => Err(DateParseError::UnsupportedValue),
    }
}

/// Parse, substituting `fallback` for anything unrecognized.
pub fn parse_date_or(value: &DateLike, fallback: NaiveDate) -> NaiveDate {
    parse_date(value).unwrap_or_else(|e| {
        log::debug!("date fallback for {value:?}: {e}");
        fallback
    })
}

/// Parse, substituting today's local date for anything unrecognized.
pub fn parse_date_or_today(value: &DateLike) -> NaiveDate {
    parse_date_or(value, Local::now().date_naive())
}

/// Parse the value stored at `field` of a record.
pub fn record_date(record: &Record, field: &str) -> Result<NaiveDate, DateParseError> {
    match record.get(field) {
        Some(v) => parse_date(&DateLike::from(v)),
        None => Err(DateParseError::UnsupportedValue),
    }
}

/// Keep only the records whose `field` holds a parseable date.
pub fn filter_temporal<'a>(records: &'a [Record], field: &str) -> Vec<&'a Record> {
    let kept: Vec<&Record> = records
        .iter()
        .filter(|r| record_date(r, field).is_ok())
        .collect();
    if kept.len() < records.len() {
        log::debug!(
            "dropped {} of {} records without a date in `{field}`",
            records.len() - kept.len(),
            records.len()
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_all_three_string_shapes() {
        let d = parse_date(&"2021-07-15".into()).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2021, 7, 15));
        let d = parse_date(&"2021-07".into()).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2021, 7, 1));
        let d = parse_date(&"1999".into()).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1999, 1, 1));
    }

    #[test]
    fn year_number_maps_to_january_first() {
        let d = parse_date(&DateLike::Year(1987)).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(1987, 1, 1).unwrap());
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert_eq!(
            parse_date(&"99".into()),
            Err(DateParseError::UnrecognizedFormat("99".into()))
        );
        assert!(matches!(
            parse_date(&"2020-xx-01".into()),
            Err(DateParseError::NonNumeric(_))
        ));
        assert!(matches!(
            parse_date(&"2021-02-30".into()),
            Err(DateParseError::OutOfRange { .. })
        ));
        assert_eq!(parse_date(&DateLike::Other), Err(DateParseError::UnsupportedValue));
        assert!(parse_date(&"2020-01-02-03".into()).is_err());
    }

    #[test]
    fn lenient_parse_uses_fallback() {
        let fallback = NaiveDate::from_ymd_opt(2000, 6, 1).unwrap();
        assert_eq!(parse_date_or(&"soon".into(), fallback), fallback);
        assert_eq!(
            parse_date_or(&"2001".into(), fallback),
            NaiveDate::from_ymd_opt(2001, 1, 1).unwrap()
        );
    }
}
