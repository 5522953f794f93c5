//! Adaptive time axes: pick a tick interval from the data's date span, generate
//! calendar-aligned ticks on a padded scale, and make sure the latest date gets a label.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::models::Record;
use crate::stats::date_extent;

/// Fraction of the date span added on each side of the domain.
pub const DEFAULT_TIME_PADDING: f64 = 0.05;

/// Tick count bound honored when the latest date has to be appended.
pub const MAX_TIME_TICKS: usize = 7;

const DAYS_PER_YEAR: f64 = 365.25;
// Safety valve for tick generation over absurd domains.
const MAX_TICK_ITERATIONS: usize = 10_000;

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// Distance between the earliest and latest date in three units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateSpan {
    pub days: f64,
    pub months: f64,
    pub years: f64,
}

impl DateSpan {
    pub fn between(min: NaiveDate, max: NaiveDate) -> Self {
        let days = (max - min).num_days() as f64;
        let years = days / DAYS_PER_YEAR;
        Self {
            days,
            months: years * 12.0,
            years,
        }
    }
}

/// How tick labels are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    /// `2020`
    Year,
    /// `20Q3`
    Quarter,
    /// `05 Mar`
    DayMonth,
}

impl LabelFormat {
    pub fn format(self, d: NaiveDate) -> String {
        match self {
            LabelFormat::Year => d.year().to_string(),
            LabelFormat::Quarter => {
                format!("{:02}Q{}", d.year().rem_euclid(100), d.month0() / 3 + 1)
            }
            LabelFormat::DayMonth => d.format("%d %b").to_string(),
        }
    }
}

/// Tick density bands, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickInterval {
    Decade,
    FiveYear,
    TwoYear,
    Year,
    Quarter,
    Month,
    Week,
    Day,
}

impl TickInterval {
    /// Pick the band for a date span.
    pub fn classify(span: &DateSpan) -> Self {
        if span.years >= 35.0 {
            TickInterval::Decade
        } else if span.years >= 15.0 {
            TickInterval::FiveYear
        } else if span.years >= 7.0 {
            TickInterval::TwoYear
        } else if span.years >= 2.0 {
            TickInterval::Year
        } else if span.months >= 9.0 {
            TickInterval::Quarter
        } else if span.months >= 2.0 {
            TickInterval::Month
        } else if span.days >= 14.0 {
            TickInterval::Week
        } else {
            TickInterval::Day
        }
    }

    pub fn label_format(self) -> LabelFormat {
        match self {
            TickInterval::Decade
            | TickInterval::FiveYear
            | TickInterval::TwoYear
            | TickInterval::Year => LabelFormat::Year,
            TickInterval::Quarter => LabelFormat::Quarter,
            TickInterval::Month | TickInterval::Week | TickInterval::Day => LabelFormat::DayMonth,
        }
    }

    pub fn format(self, d: NaiveDate) -> String {
        self.label_format().format(d)
    }

    fn year_step(self) -> Option<i32> {
        match self {
            TickInterval::Decade => Some(10),
            TickInterval::FiveYear => Some(5),
            TickInterval::TwoYear => Some(2),
            TickInterval::Year => Some(1),
            _ => None,
        }
    }

    /// Latest interval boundary at or before `d`.
    fn floor(self, d: NaiveDate) -> Option<NaiveDate> {
        if let Some(step) = self.year_step() {
            let y = d.year().div_euclid(step) * step;
            // Near the calendar's lower bound the aligned year may not exist.
            return NaiveDate::from_ymd_opt(y, 1, 1)
                .or_else(|| NaiveDate::from_ymd_opt(y + step, 1, 1));
        }
        match self {
            TickInterval::Quarter => NaiveDate::from_ymd_opt(d.year(), d.month0() / 3 * 3 + 1, 1),
            TickInterval::Month => d.with_day(1),
            // Weeks start on Sunday.
            TickInterval::Week => {
                d.checked_sub_days(Days::new(d.weekday().num_days_from_sunday() as u64))
            }
            _ => Some(d),
        }
    }

    fn next(self, d: NaiveDate) -> Option<NaiveDate> {
        if let Some(step) = self.year_step() {
            return NaiveDate::from_ymd_opt(d.year() + step, 1, 1);
        }
        match self {
            TickInterval::Quarter => d.checked_add_months(Months::new(3)),
            TickInterval::Month => d.checked_add_months(Months::new(1)),
            TickInterval::Week => d.checked_add_days(Days::new(7)),
            _ => d.checked_add_days(Days::new(1)),
        }
    }

    /// Interval boundaries falling inside `[start, end]`.
    pub fn ticks_between(self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let Some(mut t) = self.floor(start.date()) else {
            return out;
        };
        for _ in 0..MAX_TICK_ITERATIONS {
            if midnight(t) > end {
                break;
            }
            if midnight(t) >= start {
                out.push(t);
            }
            match self.next(t) {
                Some(n) => t = n,
                None => break,
            }
        }
        out
    }
}

/// Continuous date -> pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub domain: (NaiveDateTime, NaiveDateTime),
    pub range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    fn domain_ms(&self) -> i64 {
        (self.domain.1 - self.domain.0).num_milliseconds()
    }

    /// A zero-length domain maps everything to the middle of the range.
    pub fn map_datetime(&self, t: NaiveDateTime) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain_ms();
        if span == 0 {
            return (r0 + r1) / 2.0;
        }
        let f = (t - self.domain.0).num_milliseconds() as f64 / span as f64;
        r0 + f * (r1 - r0)
    }

    pub fn map(&self, d: NaiveDate) -> f64 {
        self.map_datetime(midnight(d))
    }

    pub fn invert(&self, px: f64) -> NaiveDateTime {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return self.domain.0;
        }
        let f = (px - r0) / (r1 - r0);
        let offset = (f * self.domain_ms() as f64).round() as i64;
        let saturated = if offset < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        };
        TimeDelta::try_milliseconds(offset)
            .and_then(|delta| self.domain.0.checked_add_signed(delta))
            .unwrap_or(saturated)
    }
}

/// Everything a chart needs to draw a date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    pub scale: TimeScale,
    pub ticks: Vec<NaiveDate>,
    pub interval: TickInterval,
    pub span: DateSpan,
    /// Earliest and latest data date (unpadded)
    pub extent: (NaiveDate, NaiveDate),
}

impl TimeAxis {
    /// Build the axis for a known date extent.
    pub fn from_extent(min: NaiveDate, max: NaiveDate, range: (f64, f64), padding: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let span = DateSpan::between(min, max);
        let interval = TickInterval::classify(&span);

        let span_ms = (max - min).num_milliseconds() as f64;
        let pad = TimeDelta::try_milliseconds((span_ms * padding.max(0.0)).round() as i64)
            .unwrap_or(TimeDelta::MAX);
        // Padding clamps at the ends of the representable calendar.
        let domain = (
            midnight(min)
                .checked_sub_signed(pad)
                .unwrap_or(NaiveDateTime::MIN),
            midnight(max)
                .checked_add_signed(pad)
                .unwrap_or(NaiveDateTime::MAX),
        );
        let scale = TimeScale::new(domain, range);

        let mut ticks = interval.ticks_between(domain.0, domain.1);
        if ticks.last().is_none_or(|last| *last < max) {
            if ticks.len() >= MAX_TIME_TICKS {
                ticks.pop();
            }
            ticks.push(max);
        }

        log::debug!(
            "time axis {min}..{max}: {:.1} years -> {interval:?}, {} ticks",
            span.years,
            ticks.len()
        );

        Self {
            scale,
            ticks,
            interval,
            span,
            extent: (min, max),
        }
    }

    pub fn format(&self, d: NaiveDate) -> String {
        self.interval.format(d)
    }

    /// `(pixel, label)` per tick.
    pub fn tick_labels(&self) -> Vec<(f64, String)> {
        self.ticks
            .iter()
            .map(|t| (self.scale.map(*t), self.format(*t)))
            .collect()
    }
}

/// Time axis over the parseable dates at `field`.
pub fn compute_time_axis(
    records: &[Record],
    field: &str,
    range: (f64, f64),
    padding: f64,
) -> Result<TimeAxis, LayoutError> {
    let (min, max) = date_extent(records, field).ok_or_else(|| LayoutError::EmptyDomain {
        field: field.to_string(),
    })?;
    Ok(TimeAxis::from_extent(min, max, range, padding))
}
