use chartkit::models::Record;
use chartkit::viz::{RangeFormatter, ValueUnit, format_value};
use serde_json::json;

fn rows(values: &[f64]) -> Vec<Record> {
    values
        .iter()
        .map(|v| json!({"value": v}).as_object().cloned().unwrap())
        .collect()
}

fn suffix(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-')
}

#[test]
fn range_example_formats_in_millions() {
    let data = rows(&[950.0, 1_200_000.0, 2_600_000.0]);
    let f = RangeFormatter::for_field(&data, "value");
    assert_eq!(f.unit(), ValueUnit::Millions);
    assert_eq!(f.format(950.0), "0.00M");
    assert_eq!(f.format(2_600_000.0), "2.60M");
}

#[test]
fn min_and_max_share_a_suffix() {
    let ranges = [
        (0.0, 999.0),
        (10.0, 5_000.0),
        (999_000.0, 1_000_500.0),
        (-3_000_000.0, 4_000_000.0),
        (1.0, 7.5e9),
        (2_000_000_000.0, 2_000_000_100.0),
    ];
    for (min, max) in ranges {
        let f = RangeFormatter::for_range(min, max);
        assert_eq!(suffix(&f.format(min)), suffix(&f.format(max)), "{min}..{max}");
    }
}

#[test]
fn narrow_range_of_large_values_stays_plain() {
    // range 100 even though the values are in the billions
    let f = RangeFormatter::for_range(2_000_000_000.0, 2_000_000_100.0);
    assert_eq!(f.unit(), ValueUnit::Plain);
    assert_eq!(f.format(2_000_000_100.0), "2000000100.00");
    // per-value formatting picks its own unit
    assert_eq!(format_value(2_000_000_100.0), "2B");
}

#[test]
fn field_without_numbers_formats_plain() {
    let data = vec![json!({"value": "n/a"}).as_object().cloned().unwrap()];
    let f = RangeFormatter::for_field(&data, "value");
    assert_eq!(f.unit(), ValueUnit::Plain);
    assert_eq!(f.format(1234.5), "1234.50");
}

#[test]
fn per_value_labels_mix_units() {
    let labels: Vec<String> = [12.0, 4_500.0, 3_250_000.0, 9.9e9]
        .iter()
        .map(|v| format_value(*v))
        .collect();
    assert_eq!(labels, vec!["12", "4.5K", "3.25M", "9.9B"]);
}
