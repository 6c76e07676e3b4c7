use log::debug;

use crate::alias::{AliasTable, TRADE_ID};
use crate::compare::compare;
use crate::config::ReconConfig;
use crate::model::{BookingRecord, CanonicalFieldSet, TradeResult};
use crate::resolver::{resolve, Resolution};

/// Reconcile every present term-sheet field against one booking record.
///
/// Fields are visited in canonical order, so the comparison sequence does not
/// depend on the record's key order.
pub fn reconcile(
    trade_index: usize,
    canonical_fields: &CanonicalFieldSet,
    record: &BookingRecord,
    aliases: &AliasTable,
    config: &ReconConfig,
) -> TradeResult {
    let comparisons = canonical_fields
        .present()
        .map(|(field, expected)| {
            let resolution = resolve(field.as_str(), record, aliases);
            if resolution == Resolution::NotFound {
                debug!("trade {trade_index}: no booking key resolved for {field}");
            }
            compare(field, expected, resolution, field.field_type(), config)
        })
        .collect();

    TradeResult::new(trade_index, trade_id(record, aliases), comparisons)
}

fn trade_id(record: &BookingRecord, aliases: &AliasTable) -> Option<String> {
    resolve(TRADE_ID, record, aliases)
        .value()
        .map(|v| v.to_string().trim().to_string())
}
