use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Relative tolerance applied to numeric fields (0.1%).
pub const DEFAULT_NUMERIC_TOLERANCE: f64 = 0.001;

/// Dates must match exactly unless configured otherwise.
pub const DEFAULT_DATE_TOLERANCE_DAYS: i64 = 0;

// ---------------------------------------------------------------------------
// Text matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Trimmed, byte-for-byte equality.
    #[default]
    CaseSensitive,
    /// Trimmed, compared after lowercasing both sides.
    CaseInsensitive,
}

impl std::fmt::Display for TextMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseSensitive => write!(f, "case_sensitive"),
            Self::CaseInsensitive => write!(f, "case_insensitive"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine config
// ---------------------------------------------------------------------------

/// Immutable comparison settings threaded into every comparison.
///
/// Tolerances are validated once, at construction. Deserialization goes
/// through the same validation, so a `ReconConfig` value is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReconConfig")]
pub struct ReconConfig {
    date_tolerance_days: i64,
    numeric_tolerance: f64,
    text_match: TextMatch,
    filter_by_isin: bool,
}

impl ReconConfig {
    pub fn new(date_tolerance_days: i64, numeric_tolerance: f64) -> Result<Self, ReconError> {
        if date_tolerance_days < 0 {
            return Err(ReconError::InvalidTolerance {
                name: "date_tolerance_days",
                value: date_tolerance_days as f64,
            });
        }
        if !numeric_tolerance.is_finite() || numeric_tolerance < 0.0 {
            return Err(ReconError::InvalidTolerance {
                name: "numeric_tolerance",
                value: numeric_tolerance,
            });
        }
        Ok(Self {
            date_tolerance_days,
            numeric_tolerance,
            text_match: TextMatch::default(),
            filter_by_isin: false,
        })
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    /// Only reconcile booking records carrying the term sheet's ISIN.
    pub fn with_isin_filter(mut self, enabled: bool) -> Self {
        self.filter_by_isin = enabled;
        self
    }

    pub fn date_tolerance_days(&self) -> i64 {
        self.date_tolerance_days
    }

    pub fn numeric_tolerance(&self) -> f64 {
        self.numeric_tolerance
    }

    pub fn text_match(&self) -> TextMatch {
        self.text_match
    }

    pub fn filter_by_isin(&self) -> bool {
        self.filter_by_isin
    }
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            date_tolerance_days: DEFAULT_DATE_TOLERANCE_DAYS,
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
            text_match: TextMatch::default(),
            filter_by_isin: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawReconConfig {
    date_tolerance_days: i64,
    numeric_tolerance: f64,
    text_match: TextMatch,
    filter_by_isin: bool,
}

impl Default for RawReconConfig {
    fn default() -> Self {
        Self {
            date_tolerance_days: DEFAULT_DATE_TOLERANCE_DAYS,
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
            text_match: TextMatch::default(),
            filter_by_isin: false,
        }
    }
}

impl TryFrom<RawReconConfig> for ReconConfig {
    type Error = ReconError;

    fn try_from(raw: RawReconConfig) -> Result<Self, Self::Error> {
        Ok(ReconConfig::new(raw.date_tolerance_days, raw.numeric_tolerance)?
            .with_text_match(raw.text_match)
            .with_isin_filter(raw.filter_by_isin))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
