use crate::models::{ChartPayload, Record};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Read a chart payload from a JSON file.
pub fn load_payload<P: AsRef<Path>>(path: P) -> Result<ChartPayload> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let payload = ChartPayload::from_json_str(&s)
        .with_context(|| format!("parsing payload {}", path.display()))?;
    Ok(payload)
}

/// Turn a CSV cell into JSON: numbers where the cell looks numeric, empty -> null, else string.
fn cell_to_value(cell: &str) -> Value {
    let t = cell.trim();
    if t.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Value::Number(i.into());
    }
    match t.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(t.to_string()),
    }
}

/// Load flat records from a CSV file with a header row.
pub fn load_records_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut rec = Record::new();
        for (h, cell) in headers.iter().zip(row.iter()) {
            rec.insert(h.to_string(), cell_to_value(cell));
        }
        out.push(rec);
    }
    log::debug!("loaded {} records from {}", out.len(), path.display());
    Ok(out)
}

/// Save any serializable value as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
