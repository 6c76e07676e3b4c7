// JSON booking import and batch export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::warn;
use serde_json::Value;
use tsrecon_engine::{BatchResult, BookingRecord, FieldValue};

use crate::error::{LoadError, ReportError};

/// Convert a JSON scalar into a field value. `null` is absent; booleans and
/// nested values keep their JSON text.
pub fn value_to_field(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
        nested => Some(FieldValue::Text(nested.to_string())),
    }
}

/// Parse booking records from a JSON document.
///
/// Accepted shapes: an array of objects, an object holding a `trades` or
/// `records` array, or a single object (one record).
pub fn parse_booking_json(content: &str) -> Result<Vec<BookingRecord>, LoadError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| LoadError::Json(e.to_string()))?;

    let items: Vec<&Value> = match &doc {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match ["trades", "records"].iter().find_map(|k| map.get(*k)) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => {
                return Err(LoadError::Shape(
                    "'trades'/'records' must be an array of objects".to_string(),
                ))
            }
            None => vec![&doc],
        },
        _ => {
            return Err(LoadError::Shape(
                "booking JSON must be an object or an array of objects".to_string(),
            ))
        }
    };

    let mut records: Vec<BookingRecord> = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            warn!("skipping booking entry {}: not a JSON object", i + 1);
            continue;
        };
        records.push(
            map.iter()
                .map(|(key, value)| (key.clone(), value_to_field(value)))
                .collect(),
        );
    }
    Ok(records)
}

/// Pretty-printed JSON of a batch result.
pub fn to_pretty_json(batch: &BatchResult) -> Result<String, ReportError> {
    serde_json::to_string_pretty(batch).map_err(|e| ReportError::Json(e.to_string()))
}

pub fn export(batch: &BatchResult, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, batch).map_err(|e| ReportError::Json(e.to_string()))
}
