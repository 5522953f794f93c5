use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::record_date;
use crate::models::Record;

/// Min/max of a numeric field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Extent {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Read a numeric cell. JSON numbers and numeric strings count; everything else is skipped.
pub fn numeric_value(record: &Record, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Min/max over all numeric values of `field`; `None` when there are none.
pub fn numeric_extent(records: &[Record], field: &str) -> Option<Extent> {
    let mut out: Option<Extent> = None;
    for v in records.iter().filter_map(|r| numeric_value(r, field)) {
        out = Some(match out {
            None => Extent { min: v, max: v, count: 1 },
            Some(e) => Extent {
                min: e.min.min(v),
                max: e.max.max(v),
                count: e.count + 1,
            },
        });
    }
    out
}

/// Earliest and latest parseable date of `field`.
pub fn date_extent(records: &[Record], field: &str) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = records.iter().filter_map(|r| record_date(r, field).ok());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}
