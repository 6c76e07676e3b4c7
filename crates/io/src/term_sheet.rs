// Extracted term sheet loading

use std::path::Path;

use chrono::NaiveDate;
use log::{debug, warn};
use serde_json::{Map, Value};
use tsrecon_engine::{CanonicalField, CanonicalFieldSet, FieldType, FieldValue};

use crate::error::LoadError;
use crate::json::value_to_field;

/// Canonical fields extracted from one term sheet document.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSheet {
    pub id: String,
    pub fields: CanonicalFieldSet,
    /// Extraction confidence reported by the upstream extractor, if any.
    pub confidence: Option<f64>,
}

pub fn load_term_sheet(path: &Path) -> Result<TermSheet, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let default_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "term_sheet".to_string());
    parse_term_sheet(&content, &default_id)
}

/// Parse a term sheet JSON object.
///
/// Canonical keys may sit at the top level or under a `fields` object.
/// `null` means absent. ISO strings on date fields become dates; anything
/// else is kept as-is for the comparator to judge.
pub fn parse_term_sheet(content: &str, default_id: &str) -> Result<TermSheet, LoadError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| LoadError::Json(e.to_string()))?;
    let Value::Object(top) = doc else {
        return Err(LoadError::Shape("term sheet must be a JSON object".to_string()));
    };

    let id = match top.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default_id.to_string(),
    };
    let confidence = top.get("confidence").and_then(Value::as_f64);

    let fields = match top.get("fields") {
        Some(Value::Object(nested)) => canonical_fields(nested),
        Some(_) => return Err(LoadError::Shape("'fields' must be a JSON object".to_string())),
        None => canonical_fields(&top),
    };

    debug!("term sheet '{}': {} fields present", id, fields.present_count());
    Ok(TermSheet { id, fields, confidence })
}

fn canonical_fields(map: &Map<String, Value>) -> CanonicalFieldSet {
    map.iter()
        .filter(|(key, _)| !matches!(key.as_str(), "id" | "confidence" | "fields"))
        .filter_map(|(key, value)| match key.parse::<CanonicalField>() {
            Ok(field) => Some((field, typed_value(field, value))),
            Err(e) => {
                warn!("ignoring term sheet key: {e}");
                None
            }
        })
        .collect()
}

fn typed_value(field: CanonicalField, value: &Value) -> Option<FieldValue> {
    let value = value_to_field(value)?;
    match (field.field_type(), &value) {
        (FieldType::Date, FieldValue::Text(s)) => {
            match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(date) => Some(FieldValue::Date(date)),
                Err(_) => Some(value),
            }
        }
        _ => Some(value),
    }
}
