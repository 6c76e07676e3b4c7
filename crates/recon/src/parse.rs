use chrono::NaiveDate;

use crate::model::FieldValue;

/// Date layouts accepted for text values, tried in order. Day-first layouts
/// precede the US month-first one, so `01/02/2025` reads as 1 February.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
];

/// Parse a financial number string:
/// - Strip currency symbols, thousands separators, whitespace and a trailing `%`
/// - Handle `(123.45)` → `-123.45`
/// - Accept an exponent (`1.2E+09`)
/// - Returns None if non-numeric characters remain after stripping, or on overflow
pub fn parse_financial_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let (is_negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '_') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // Spreadsheet exports write large amounts in scientific form (`1.2E+09`).
    let mut prev = None;
    let mut seen_exponent = false;
    for (i, c) in cleaned.chars().enumerate() {
        match c {
            '0'..='9' | '.' => {}
            '-' | '+' if i == 0 && !is_negative => {}
            '-' | '+' if matches!(prev, Some('e' | 'E')) => {}
            'e' | 'E' if i > 0 && !seen_exponent => seen_exponent = true,
            _ => return None,
        }
        prev = Some(c);
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if is_negative { -value } else { value })
}

/// Parse a calendar date from common term-sheet and booking layouts.
/// ISO date-times (`2025-10-14T00:00:00`) are truncated to their date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // Date-time: keep the leading ISO date when followed by a time separator.
    match (trimmed.get(..10), trimmed.get(10..11)) {
        (Some(head), Some("T" | " ")) => NaiveDate::parse_from_str(head, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// Numeric reading of a value, if it has one.
pub fn as_number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n),
        FieldValue::Number(_) | FieldValue::Date(_) => None,
        FieldValue::Text(s) => parse_financial_number(s),
    }
}

/// Calendar-date reading of a value, if it has one.
pub fn as_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::Number(_) => None,
        FieldValue::Text(s) => parse_date(s),
    }
}
