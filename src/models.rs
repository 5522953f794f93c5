use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::PayloadError;
use crate::viz::color::{ColorScheme, Palette, Rgba};

/// One plotted row: a flat JSON object.
pub type Record = Map<String, Value>;

/// A value that may carry a date: a concrete date, a bare year, a string, or anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLike {
    /// Already a calendar date
    Date(NaiveDate),
    /// Bare calendar year like 2020
    Year(i64),
    /// `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`
    Text(String),
    /// null, bool, object, array, or a non-integral number
    Other,
}

impl From<&Value> for DateLike {
    fn from(v: &Value) -> Self {
        match v {
            Value::String(s) => DateLike::Text(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(y) => DateLike::Year(y),
                // Fractional years truncate toward zero, like a calendar constructor would.
                None => match n.as_f64() {
                    Some(f) if f.is_finite() => DateLike::Year(f.trunc() as i64),
                    _ => DateLike::Other,
                },
            },
            _ => DateLike::Other,
        }
    }
}

impl From<NaiveDate> for DateLike {
    fn from(d: NaiveDate) -> Self {
        DateLike::Date(d)
    }
}

impl From<&str> for DateLike {
    fn from(s: &str) -> Self {
        DateLike::Text(s.to_string())
    }
}

impl From<i64> for DateLike {
    fn from(y: i64) -> Self {
        DateLike::Year(y)
    }
}

/// Semantic description of a record field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    /// `x`, `y`, `group`, ...
    pub role: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// `data` section of the payload: the rows plus their column roles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataSection {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

/// Font settings for one text class (`label`, `title`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypographySpec {
    #[serde(default)]
    pub font_family: Option<String>,
    /// Some payloads encode the size as `12`, others as `"12px"`.
    #[serde(default, deserialize_with = "de_opt_f64_from_string_or_number")]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub font_weight: Option<String>,
}

/// Per-category colors plus an optional fallback palette.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ColorsSpec {
    #[serde(default)]
    pub field: BTreeMap<String, String>,
    #[serde(default)]
    pub available_colors: Vec<String>,
}

/// Full JSON configuration a chart consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartPayload {
    pub data: DataSection,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default)]
    pub typography: BTreeMap<String, TypographySpec>,
    #[serde(default)]
    pub colors: ColorsSpec,
    #[serde(default)]
    pub colors_dark: Option<ColorsSpec>,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

impl ChartPayload {
    pub fn from_json_str(s: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn records(&self) -> &[Record] {
        &self.data.data
    }

    /// First column declared with `role`.
    pub fn column_for_role(&self, role: &str) -> Option<&ColumnSpec> {
        self.data.columns.iter().find(|c| c.role == role)
    }

    pub fn require_role(&self, role: &str) -> Result<&ColumnSpec, PayloadError> {
        self.column_for_role(role)
            .ok_or_else(|| PayloadError::MissingRole(role.to_string()))
    }

    /// Check that every required role is declared and that its field shows up in the data.
    pub fn validate(&self, required_roles: &[&str]) -> Result<(), PayloadError> {
        if self.data.data.is_empty() {
            return Err(PayloadError::NoRecords);
        }
        for role in required_roles {
            let col = self.require_role(role)?;
            if !self.data.data.iter().any(|r| r.contains_key(&col.name)) {
                return Err(PayloadError::MissingField {
                    column: col.name.clone(),
                    role: col.role.clone(),
                });
            }
        }
        Ok(())
    }

    /// Distinct values of `field`, in first-seen order. Numbers are stringified.
    pub fn group_labels(&self, field: &str) -> Vec<String> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut out = Vec::new();
        for r in &self.data.data {
            let label = match r.get(field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => continue,
                Some(other) => other.to_string(),
            };
            if seen.insert(label.clone()) {
                out.push(label);
            }
        }
        out
    }

    /// Numeric layout knob from `variables`; numeric strings are accepted.
    pub fn variable_f64(&self, key: &str) -> Option<f64> {
        match self.variables.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
            _ => None,
        }
    }

    pub fn variable_str(&self, key: &str) -> Option<&str> {
        self.variables.get(key).and_then(Value::as_str)
    }

    /// Build the color resolver for the light or dark theme.
    ///
    /// Unparseable hex strings are skipped; an empty `available_colors` means the default palette.
    pub fn color_scheme(&self, dark: bool) -> ColorScheme {
        let spec = if dark {
            self.colors_dark.as_ref().unwrap_or(&self.colors)
        } else {
            &self.colors
        };

        let mut by_label = BTreeMap::new();
        for (label, hex) in &spec.field {
            match Rgba::from_hex(hex) {
                Some(c) => {
                    by_label.insert(label.clone(), c);
                }
                None => log::warn!("ignoring invalid color {hex:?} for {label:?}"),
            }
        }

        let fallback: Vec<Rgba> = spec
            .available_colors
            .iter()
            .filter_map(|h| Rgba::from_hex(h))
            .collect();
        let palette = if fallback.is_empty() {
            Palette::default()
        } else {
            Palette::new(fallback)
        };

        ColorScheme::new(by_label, palette)
    }
}

/// Serde helper: parse an optional `f64` from a JSON number or a string like `"12px"`.
fn de_opt_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number or a string like \"12px\"")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let t = s.trim();
            let t = t.strip_suffix("px").unwrap_or(t).trim();
            t.parse::<f64>().map(Some).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}
