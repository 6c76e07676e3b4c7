use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::field::CanonicalField;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A raw extracted or booked value. Absence is modelled as `Option::None`,
/// never as an empty string or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Empty or whitespace-only text. Treated like a missing value when
    /// resolving booking keys.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Canonical fields extracted from one term sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalFieldSet {
    fields: BTreeMap<CanonicalField, Option<FieldValue>>,
}

impl CanonicalFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: CanonicalField, value: impl Into<Option<FieldValue>>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// The value for `field`, or `None` when absent.
    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.fields.get(&field).and_then(Option::as_ref)
    }

    /// Non-absent fields in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (CanonicalField, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (*field, v)))
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}

impl FromIterator<(CanonicalField, Option<FieldValue>)> for CanonicalFieldSet {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, Option<FieldValue>)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

/// One booked trade: arbitrary source keys to raw values (`None` = null).
///
/// Keys are held sorted so any scan over them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingRecord {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl BookingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.fields.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<FieldValue>) {
        self.fields.insert(key.into(), value);
    }

    /// Value under the exact key; `None` for missing keys and explicit nulls.
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).and_then(Option::as_ref)
    }

    /// The stored key and value for an exact key match.
    pub fn entry(&self, key: &str) -> Option<(&str, Option<&FieldValue>)> {
        self.fields.get_key_value(key).map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// All entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Option<FieldValue>)> for BookingRecord {
    fn from_iter<I: IntoIterator<Item = (String, Option<FieldValue>)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

// ---------------------------------------------------------------------------
// Field comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparisonResult {
    pub field: CanonicalField,
    pub term_sheet_value: FieldValue,
    /// Booking key the value was resolved from.
    pub booking_key: Option<String>,
    /// `None` when no alias resolved ("not found").
    pub booking_value: Option<FieldValue>,
    #[serde(rename = "match")]
    pub is_match: bool,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeResult {
    trade_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    trade_id: Option<String>,
    matched_fields: usize,
    compared_fields: usize,
    match_percentage: f64,
    perfect_match: bool,
    comparisons: Vec<FieldComparisonResult>,
}

impl TradeResult {
    /// Derive match statistics from a finished set of comparisons.
    ///
    /// A trade with no compared fields is never a perfect match and scores 0%.
    pub fn new(
        trade_index: usize,
        trade_id: Option<String>,
        comparisons: Vec<FieldComparisonResult>,
    ) -> Self {
        let compared_fields = comparisons.len();
        let matched_fields = comparisons.iter().filter(|c| c.is_match).count();
        let match_percentage = if compared_fields == 0 {
            0.0
        } else {
            matched_fields as f64 / compared_fields as f64 * 100.0
        };
        let perfect_match = compared_fields > 0 && matched_fields == compared_fields;

        Self {
            trade_index,
            trade_id,
            matched_fields,
            compared_fields,
            match_percentage,
            perfect_match,
            comparisons,
        }
    }

    /// 1-based position of the record in the booking dataset.
    pub fn trade_index(&self) -> usize {
        self.trade_index
    }

    pub fn trade_id(&self) -> Option<&str> {
        self.trade_id.as_deref()
    }

    /// Trade id when the record carries one, otherwise the index.
    pub fn label(&self) -> String {
        match &self.trade_id {
            Some(id) => id.clone(),
            None => self.trade_index.to_string(),
        }
    }

    pub fn comparisons(&self) -> &[FieldComparisonResult] {
        &self.comparisons
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &FieldComparisonResult> {
        self.comparisons.iter().filter(|c| !c.is_match)
    }

    pub fn matched_fields(&self) -> usize {
        self.matched_fields
    }

    pub fn compared_fields(&self) -> usize {
        self.compared_fields
    }

    /// Percentage in `0.0..=100.0`.
    pub fn match_percentage(&self) -> f64 {
        self.match_percentage
    }

    pub fn perfect_match(&self) -> bool {
        self.perfect_match
    }

    pub fn summary(&self) -> String {
        format!(
            "Trade {}: {}/{} fields match ({:.1}%)",
            self.label(),
            self.matched_fields,
            self.compared_fields,
            self.match_percentage,
        )
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    term_sheet_id: String,
    booking_source_id: String,
    engine_version: String,
    total_trades: usize,
    perfect_matches: usize,
    success_rate: f64,
    trades: Vec<TradeResult>,
}

impl BatchResult {
    pub fn new(
        term_sheet_id: impl Into<String>,
        booking_source_id: impl Into<String>,
        trades: Vec<TradeResult>,
    ) -> Self {
        let total_trades = trades.len();
        let perfect_matches = trades.iter().filter(|t| t.perfect_match()).count();
        let success_rate = if total_trades == 0 {
            0.0
        } else {
            perfect_matches as f64 / total_trades as f64
        };

        Self {
            term_sheet_id: term_sheet_id.into(),
            booking_source_id: booking_source_id.into(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            total_trades,
            perfect_matches,
            success_rate,
            trades,
        }
    }

    pub fn term_sheet_id(&self) -> &str {
        &self.term_sheet_id
    }

    pub fn booking_source_id(&self) -> &str {
        &self.booking_source_id
    }

    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    pub fn total_trades(&self) -> usize {
        self.total_trades
    }

    pub fn perfect_matches(&self) -> usize {
        self.perfect_matches
    }

    /// Fraction in `0.0..=1.0`; 0.0 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn trades(&self) -> &[TradeResult] {
        &self.trades
    }

    /// Number of trades on which each compared field failed, in canonical order.
    /// Fields that matched everywhere are omitted.
    pub fn field_mismatch_counts(&self) -> Vec<(CanonicalField, usize)> {
        let mut counts: BTreeMap<CanonicalField, usize> = BTreeMap::new();
        for trade in &self.trades {
            for mismatch in trade.mismatches() {
                *counts.entry(mismatch.field).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
