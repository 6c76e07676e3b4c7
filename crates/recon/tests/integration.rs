use chrono::NaiveDate;

use tsrecon_engine::{
    aggregate, AliasTable, BatchResult, BookingRecord, CanonicalField, CanonicalFieldSet,
    FieldValue, ReconConfig,
};

fn ymd(y: i32, m: u32, d: u32) -> FieldValue {
    FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn genel_term_sheet() -> CanonicalFieldSet {
    CanonicalFieldSet::new()
        .with(CanonicalField::Isin, FieldValue::from("NO0010894330"))
        .with(CanonicalField::CouponRate, FieldValue::Number(9.25))
        .with(CanonicalField::MaturityDate, ymd(2025, 10, 14))
}

fn run(term_sheet: &CanonicalFieldSet, records: &[BookingRecord]) -> BatchResult {
    let config = ReconConfig::new(0, 0.001).unwrap();
    aggregate(
        term_sheet,
        records,
        &AliasTable::bond_defaults(),
        &config,
        "Genel-Energy.pdf",
        "Genel_Energy_Trades.json",
    )
}

// -------------------------------------------------------------------------
// End-to-end scenarios
// -------------------------------------------------------------------------

#[test]
fn coupon_mismatch_scenario() {
    let record = BookingRecord::new()
        .with("coupon_rate", 9.5)
        .with("maturity_date", "2025-10-14")
        .with("ISIN", "NO0010894330");
    let batch = run(&genel_term_sheet(), &[record]);

    assert_eq!(batch.total_trades(), 1);
    let trade = &batch.trades()[0];
    let by_field = |f: CanonicalField| trade.comparisons().iter().find(|c| c.field == f).unwrap();

    assert!(by_field(CanonicalField::Isin).is_match);
    assert_eq!(by_field(CanonicalField::Isin).booking_key.as_deref(), Some("ISIN"));
    assert!(by_field(CanonicalField::MaturityDate).is_match);

    let coupon = by_field(CanonicalField::CouponRate);
    assert!(!coupon.is_match);
    assert_eq!(coupon.note.as_deref(), Some("Difference: 0.2500"));

    assert_eq!(format!("{:.1}", trade.match_percentage()), "66.7");
    assert!(!trade.perfect_match());
    assert_eq!(batch.perfect_matches(), 0);
}

#[test]
fn maturity_off_by_one_day_scenario() {
    let record = BookingRecord::new()
        .with("coupon_rate", 9.5)
        .with("maturity_date", "2025-10-15")
        .with("ISIN", "NO0010894330");
    let batch = run(&genel_term_sheet(), &[record]);
    let trade = &batch.trades()[0];

    let maturity = trade
        .comparisons()
        .iter()
        .find(|c| c.field == CanonicalField::MaturityDate)
        .unwrap();
    assert!(!maturity.is_match);
    let note = maturity.note.as_deref().unwrap();
    assert!(note.starts_with("Date difference: 1 days"), "note was {note:?}");

    // Independent of the coupon outcome.
    let fixed_coupon = BookingRecord::new()
        .with("coupon_rate", 9.25)
        .with("maturity_date", "2025-10-15")
        .with("ISIN", "NO0010894330");
    let batch = run(&genel_term_sheet(), &[fixed_coupon]);
    let mismatched: Vec<_> = batch.trades()[0].mismatches().map(|c| c.field).collect();
    assert_eq!(mismatched, vec![CanonicalField::MaturityDate]);
}

#[test]
fn batch_of_five_with_three_perfect() {
    let good = || {
        BookingRecord::new()
            .with("ISIN", "NO0010894330")
            .with("Coupon", 9.25)
            .with("Maturity", "14/10/2025")
    };
    let bad = || {
        BookingRecord::new()
            .with("ISIN", "NO0010894330")
            .with("Coupon", 10.0)
            .with("Maturity", "2025-10-14")
    };
    let records = vec![good(), bad(), good(), good(), bad()];
    let batch = run(&genel_term_sheet(), &records);

    assert_eq!(batch.total_trades(), 5);
    assert_eq!(batch.perfect_matches(), 3);
    assert_eq!(batch.success_rate(), 0.60);
    assert_eq!(batch.field_mismatch_counts(), vec![(CanonicalField::CouponRate, 2)]);
}

// -------------------------------------------------------------------------
// Degenerate input
// -------------------------------------------------------------------------

#[test]
fn empty_term_sheet_never_perfect() {
    let records = vec![
        BookingRecord::new().with("ISIN", "NO0010894330"),
        BookingRecord::new(),
    ];
    let batch = run(&CanonicalFieldSet::new(), &records);
    for trade in batch.trades() {
        assert!(!trade.perfect_match());
        assert_eq!(trade.match_percentage(), 0.0);
    }
    assert_eq!(batch.success_rate(), 0.0);
}

#[test]
fn all_absent_term_sheet_behaves_as_empty() {
    let term_sheet = CanonicalFieldSet::new()
        .with(CanonicalField::Isin, None)
        .with(CanonicalField::Tenor, None);
    let batch = run(&term_sheet, &[BookingRecord::new().with("ISIN", "X")]);
    assert_eq!(batch.trades()[0].compared_fields(), 0);
    assert!(!batch.trades()[0].perfect_match());
}

#[test]
fn no_booking_records() {
    let batch = run(&genel_term_sheet(), &[]);
    assert_eq!(batch.total_trades(), 0);
    assert_eq!(batch.perfect_matches(), 0);
    assert_eq!(batch.success_rate(), 0.0);
    assert!(batch.trades().is_empty());
}

// -------------------------------------------------------------------------
// Partial results
// -------------------------------------------------------------------------

#[test]
fn malformed_field_does_not_abort_batch() {
    let records = vec![
        BookingRecord::new()
            .with("ISIN", "NO0010894330")
            .with("Coupon", "n/a")
            .with("Maturity", "someday"),
        BookingRecord::new()
            .with("ISIN", "NO0010894330")
            .with("Coupon", "9.25%")
            .with("Maturity", "2025-10-14T00:00:00"),
    ];
    let batch = run(&genel_term_sheet(), &records);

    assert_eq!(batch.total_trades(), 2);
    let first = &batch.trades()[0];
    assert_eq!(first.matched_fields(), 1);
    assert!(first
        .mismatches()
        .all(|c| c.note.as_deref().unwrap_or("").starts_with("Parse failure")));
    assert!(batch.trades()[1].perfect_match());
}

#[test]
fn notional_is_never_compared() {
    let record = BookingRecord::new()
        .with("ISIN", "NO0010894330")
        .with("Notional", 1_000_000.0);
    let term_sheet = CanonicalFieldSet::new().with(CanonicalField::Isin, FieldValue::from("NO0010894330"));
    let batch = run(&term_sheet, &[record]);
    assert_eq!(batch.trades()[0].compared_fields(), 1);
    assert!(batch.trades()[0].perfect_match());
}

// -------------------------------------------------------------------------
// Determinism + serialization
// -------------------------------------------------------------------------

#[test]
fn repeated_runs_are_identical() {
    let records = vec![
        BookingRecord::new()
            .with("Rate", 9.0)
            .with("Coupon", 9.25)
            .with("isin", "NO0010894330")
            .with("TradeID", "T-1"),
        BookingRecord::new().with("MaturityDate", "2025-10-20").with("TradeID", "T-2"),
    ];
    let first = run(&genel_term_sheet(), &records);
    let first_json = serde_json::to_string(&first).unwrap();
    for _ in 0..5 {
        let again = run(&genel_term_sheet(), &records);
        assert_eq!(again, first);
        assert_eq!(serde_json::to_string(&again).unwrap(), first_json);
    }
}

#[test]
fn batch_serializes_for_reporting() {
    let record = BookingRecord::new()
        .with("TradeID", 1.0)
        .with("ISIN", "NO0010894330")
        .with("Coupon", 9.5)
        .with("Maturity", "2025-10-14");
    let batch = run(&genel_term_sheet(), &[record]);
    let json = serde_json::to_value(&batch).unwrap();

    assert_eq!(json["term_sheet_id"], "Genel-Energy.pdf");
    assert_eq!(json["booking_source_id"], "Genel_Energy_Trades.json");
    assert_eq!(json["total_trades"], 1);
    assert_eq!(json["perfect_matches"], 0);
    let trade = &json["trades"][0];
    assert_eq!(trade["trade_index"], 1);
    assert_eq!(trade["trade_id"], "1");
    assert_eq!(trade["comparisons"][1]["field"], "coupon_rate");
    assert_eq!(trade["comparisons"][1]["match"], false);
    assert_eq!(trade["comparisons"][1]["note"], "Difference: 0.2500");
    assert_eq!(trade["comparisons"][2]["term_sheet_value"], "2025-10-14");
}
