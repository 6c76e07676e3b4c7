use chrono::NaiveDate;

use crate::config::{ReconConfig, TextMatch};
use crate::field::{CanonicalField, FieldType};
use crate::model::{FieldComparisonResult, FieldValue};
use crate::parse::{as_date, as_number};
use crate::resolver::Resolution;

/// Floor for the relative-tolerance denominator when the expected value is ~0.
pub const EPSILON: f64 = 1e-9;

pub const NOT_FOUND_NOTE: &str = "field not present in booking data";

/// Compare one term-sheet value against its resolved booking value.
///
/// Malformed input never fails: it downgrades to a non-match with a note.
pub fn compare(
    field: CanonicalField,
    expected: &FieldValue,
    actual: Resolution<'_>,
    field_type: FieldType,
    config: &ReconConfig,
) -> FieldComparisonResult {
    let Resolution::Found { key, value: actual } = actual else {
        return FieldComparisonResult {
            field,
            term_sheet_value: expected.clone(),
            booking_key: None,
            booking_value: None,
            is_match: false,
            similarity: 0.0,
            note: Some(NOT_FOUND_NOTE.to_string()),
        };
    };

    let outcome = match field_type {
        FieldType::String => compare_text(expected, actual, config.text_match()),
        FieldType::Number => compare_number(expected, actual, config.numeric_tolerance()),
        FieldType::Date => compare_date(expected, actual, config.date_tolerance_days()),
    };

    FieldComparisonResult {
        field,
        term_sheet_value: expected.clone(),
        booking_key: Some(key.to_string()),
        booking_value: Some(actual.clone()),
        is_match: outcome.is_match,
        similarity: outcome.similarity,
        note: outcome.note,
    }
}

struct Outcome {
    is_match: bool,
    similarity: f64,
    note: Option<String>,
}

impl Outcome {
    fn matched(similarity: f64) -> Self {
        Self { is_match: true, similarity, note: None }
    }

    fn mismatch(similarity: f64, note: String) -> Self {
        Self { is_match: false, similarity, note: Some(note) }
    }

    fn parse_failure(side: &str, raw: &FieldValue, field_type: FieldType) -> Self {
        Self::mismatch(
            0.0,
            format!("Parse failure: {side} value '{raw}' is not a valid {field_type}"),
        )
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn compare_text(expected: &FieldValue, actual: &FieldValue, mode: TextMatch) -> Outcome {
    let expected_text = expected.to_string();
    let actual_text = actual.to_string();
    let (e, a) = match mode {
        TextMatch::CaseSensitive => (expected_text.trim().to_string(), actual_text.trim().to_string()),
        TextMatch::CaseInsensitive => (
            expected_text.trim().to_lowercase(),
            actual_text.trim().to_lowercase(),
        ),
    };

    if e == a {
        return Outcome::matched(1.0);
    }

    Outcome::mismatch(
        text_similarity(&e, &a),
        format!("Text mismatch: '{}' vs '{}'", expected_text.trim(), actual_text.trim()),
    )
}

/// `1 - levenshtein / longer_len`, in `[0, 1]`. Diagnostic only.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

fn compare_number(expected: &FieldValue, actual: &FieldValue, tolerance: f64) -> Outcome {
    let Some(e) = as_number(expected) else {
        return Outcome::parse_failure("term sheet", expected, FieldType::Number);
    };
    let Some(a) = as_number(actual) else {
        return Outcome::parse_failure("booking", actual, FieldType::Number);
    };

    let diff = (e - a).abs();
    let scale = e.abs().max(EPSILON);
    let similarity = 1.0 - (diff / scale).min(1.0);

    if diff <= tolerance * scale {
        Outcome::matched(similarity)
    } else {
        Outcome::mismatch(similarity, format!("Difference: {diff:.4}"))
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

fn compare_date(expected: &FieldValue, actual: &FieldValue, tolerance_days: i64) -> Outcome {
    let Some(e) = as_date(expected) else {
        return Outcome::parse_failure("term sheet", expected, FieldType::Date);
    };
    let Some(a) = as_date(actual) else {
        return Outcome::parse_failure("booking", actual, FieldType::Date);
    };

    let offset = days_between(e, a);
    if offset.abs() <= tolerance_days {
        Outcome::matched(1.0)
    } else {
        Outcome::mismatch(
            0.0,
            format!("Date difference: {offset} days ({} vs {})", e.format("%Y-%m-%d"), a.format("%Y-%m-%d")),
        )
    }
}

/// Signed day count from `expected` to `actual`.
fn days_between(expected: NaiveDate, actual: NaiveDate) -> i64 {
    (actual - expected).num_days()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
