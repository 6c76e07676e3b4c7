// Booking dataset loading and summary

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use log::info;
use serde::Serialize;
use tsrecon_engine::parse::as_number;
use tsrecon_engine::{resolve, AliasTable, BookingRecord, CanonicalField};

use crate::error::LoadError;

/// Booking records loaded from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDataset {
    /// File name the records were read from.
    pub source_id: String,
    pub records: Vec<BookingRecord>,
}

/// Load a booking file, choosing the reader from the extension.
pub fn load_booking_file(path: &Path) -> Result<BookingDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let records = match ext.as_str() {
        "csv" => crate::csv::import(path)?,
        "json" => {
            let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
            crate::json::parse_booking_json(&content)?
        }
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };

    let source_id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    info!("loaded {} booking records from {}", records.len(), source_id);

    Ok(BookingDataset { source_id, records })
}

/// Overview of a booking dataset, resolved through the alias table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub total_records: usize,
    pub unique_isins: Vec<String>,
    pub issuers: Vec<String>,
    pub currencies: Vec<String>,
    /// (min, max) coupon over records with a numeric coupon.
    pub coupon_range: Option<(f64, f64)>,
}

impl BookingSummary {
    pub fn from_records(records: &[BookingRecord], aliases: &AliasTable) -> Self {
        let distinct = |field: CanonicalField| -> Vec<String> {
            records
                .iter()
                .filter_map(|r| resolve(field.as_str(), r, aliases).value())
                .map(|v| v.to_string().trim().to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let coupon_range = records
            .iter()
            .filter_map(|r| resolve(CanonicalField::CouponRate.as_str(), r, aliases).value())
            .filter_map(as_number)
            .fold(None, |range: Option<(f64, f64)>, c| match range {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            });

        BookingSummary {
            total_records: records.len(),
            unique_isins: distinct(CanonicalField::Isin),
            issuers: distinct(CanonicalField::Issuer),
            currencies: distinct(CanonicalField::Currency),
            coupon_range,
        }
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |items: &[String]| {
            if items.is_empty() {
                "N/A".to_string()
            } else {
                items.join(", ")
            }
        };
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "ISINs:         {}", list(&self.unique_isins))?;
        writeln!(f, "Issuers:       {}", list(&self.issuers))?;
        writeln!(f, "Currencies:    {}", list(&self.currencies))?;
        match self.coupon_range {
            Some((lo, hi)) => write!(f, "Coupon range:  {}% - {}%", lo, hi),
            None => write!(f, "Coupon range:  N/A"),
        }
    }
}
