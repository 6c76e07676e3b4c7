use log::{info, warn};

use crate::alias::AliasTable;
use crate::config::ReconConfig;
use crate::field::CanonicalField;
use crate::model::{BatchResult, BookingRecord, CanonicalFieldSet};
use crate::resolver::resolve;
use crate::trade::reconcile;

/// Reconcile one term sheet against every booking record of a dataset.
///
/// Trade indexes are 1-based input positions. With the ISIN filter enabled,
/// records for other instruments are skipped (indexes keep their original
/// positions); if no record carries the term sheet's ISIN, all are kept.
pub fn aggregate(
    canonical_fields: &CanonicalFieldSet,
    booking_records: &[BookingRecord],
    aliases: &AliasTable,
    config: &ReconConfig,
    term_sheet_id: &str,
    booking_source_id: &str,
) -> BatchResult {
    let selected = select_records(canonical_fields, booking_records, aliases, config);

    let trades = selected
        .into_iter()
        .map(|(position, record)| reconcile(position + 1, canonical_fields, record, aliases, config))
        .collect();

    let batch = BatchResult::new(term_sheet_id, booking_source_id, trades);
    info!(
        "reconciled '{}' against '{}': {}/{} trades matched perfectly",
        term_sheet_id,
        booking_source_id,
        batch.perfect_matches(),
        batch.total_trades(),
    );
    batch
}

fn select_records<'a>(
    canonical_fields: &CanonicalFieldSet,
    booking_records: &'a [BookingRecord],
    aliases: &AliasTable,
    config: &ReconConfig,
) -> Vec<(usize, &'a BookingRecord)> {
    let all: Vec<_> = booking_records.iter().enumerate().collect();

    if !config.filter_by_isin() {
        return all;
    }
    let Some(isin) = canonical_fields.get(CanonicalField::Isin) else {
        warn!("no ISIN in term sheet, reconciling against all booking records");
        return all;
    };

    let wanted = isin.to_string();
    let wanted = wanted.trim();
    let relevant: Vec<_> = all
        .iter()
        .copied()
        .filter(|(_, record)| {
            resolve(CanonicalField::Isin.as_str(), record, aliases)
                .value()
                .is_some_and(|v| v.to_string().trim() == wanted)
        })
        .collect();

    if relevant.is_empty() {
        warn!("no booking records found for ISIN {wanted}, reconciling against all records");
        return all;
    }
    relevant
}
