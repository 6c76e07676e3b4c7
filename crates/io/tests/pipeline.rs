use std::fs;

use tempfile::tempdir;
use tsrecon_engine::{aggregate, AliasTable, CanonicalField, ReconConfig};
use tsrecon_io::{
    console_summary, load_booking_file, load_term_sheet, report_base_name, write_reports,
    BookingSummary, ReportFormat,
};

const TERM_SHEET: &str = r#"{
  "id": "Genel-Energy",
  "confidence": 0.9,
  "isin": "NO0010894330",
  "issuer": "Genel Energy Finance 4 Limited",
  "coupon_rate": 9.25,
  "currency": "USD",
  "maturity_date": "2025-10-14",
  "face_value": 100000
}"#;

// Semicolon-separated export with a European date layout and a percentage
// coupon, as produced by the booking system's spreadsheet export.
const BOOKINGS: &str = "\
TradeRef;ISIN;IssuerName;Coupon;Ccy;Maturity;NominalAmountPerBond;Notional
B-100;NO0010894330;Genel Energy Finance 4 Limited;9.25 %;USD;14.10.2025;100000;5000000
B-101;NO0010894330;GENEL ENERGY FINANCE 4 LIMITED;9.25;USD;14.10.2025;100000;250000
B-102;NO0010894330;Genel Energy Finance 4 Limited;9.25;EUR;;100000;100000
";

#[test]
fn csv_bookings_end_to_end() {
    let dir = tempdir().unwrap();
    let ts_path = dir.path().join("genel.json");
    let book_path = dir.path().join("bookings.csv");
    fs::write(&ts_path, TERM_SHEET).unwrap();
    fs::write(&book_path, BOOKINGS).unwrap();

    let term_sheet = load_term_sheet(&ts_path).unwrap();
    assert_eq!(term_sheet.id, "Genel-Energy");
    assert_eq!(term_sheet.fields.present_count(), 6);

    let booking = load_booking_file(&book_path).unwrap();
    assert_eq!(booking.source_id, "bookings.csv");
    assert_eq!(booking.records.len(), 3);

    let batch = aggregate(
        &term_sheet.fields,
        &booking.records,
        &AliasTable::bond_defaults(),
        &ReconConfig::default(),
        &term_sheet.id,
        &booking.source_id,
    );

    let trades = batch.trades();
    assert_eq!(trades[0].trade_id(), Some("B-100"));

    assert!(trades[0].perfect_match());
    assert_eq!(trades[0].compared_fields(), 6);

    // Case differences in text are mismatches by default.
    let issuer = trades[1]
        .comparisons()
        .iter()
        .find(|c| c.field == CanonicalField::Issuer)
        .unwrap();
    assert!(!issuer.is_match);
    assert_eq!(issuer.booking_key.as_deref(), Some("IssuerName"));
    assert!(issuer.similarity < 1.0);

    // Empty maturity cell reads as not found; currency differs.
    let mismatched: Vec<_> = trades[2].mismatches().map(|c| c.field).collect();
    assert_eq!(mismatched, vec![CanonicalField::Currency, CanonicalField::MaturityDate]);
    let maturity = trades[2]
        .comparisons()
        .iter()
        .find(|c| c.field == CanonicalField::MaturityDate)
        .unwrap();
    assert_eq!(maturity.note.as_deref(), Some("field not present in booking data"));

    let out = dir.path().join("out");
    let base = report_base_name(batch.term_sheet_id(), batch.booking_source_id());
    let written = write_reports(&batch, &out, &base, &ReportFormat::ALL).unwrap();
    assert_eq!(written.len(), 3);

    let md = fs::read_to_string(out.join(format!("{base}.md"))).unwrap();
    assert!(md.contains("**Booking source:** bookings.csv"));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(format!("{base}.json"))).unwrap()).unwrap();
    assert_eq!(json["total_trades"], 3);

    let summary = console_summary(&batch);
    assert!(summary.contains("Trade B-101"));
}

#[test]
fn case_insensitive_text_matches_issuer() {
    let dir = tempdir().unwrap();
    let ts_path = dir.path().join("genel.json");
    let book_path = dir.path().join("bookings.csv");
    fs::write(&ts_path, TERM_SHEET).unwrap();
    fs::write(&book_path, BOOKINGS).unwrap();

    let term_sheet = load_term_sheet(&ts_path).unwrap();
    let booking = load_booking_file(&book_path).unwrap();
    let config = ReconConfig::default().with_text_match(tsrecon_engine::TextMatch::CaseInsensitive);
    let batch = aggregate(
        &term_sheet.fields,
        &booking.records,
        &AliasTable::bond_defaults(),
        &config,
        &term_sheet.id,
        &booking.source_id,
    );

    assert!(batch.trades()[1].perfect_match());
}

#[test]
fn summary_of_json_bookings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trades.json");
    fs::write(
        &path,
        r#"{"trades": [
            {"ISIN": "NO0010894330", "Issuer": "Genel", "Currency": "USD", "Coupon": 9.25},
            {"ISIN": "NO0010894330", "Issuer": "Genel", "Currency": "USD", "Coupon": 10.0},
            "not a record"
        ]}"#,
    )
    .unwrap();

    let booking = load_booking_file(&path).unwrap();
    let summary = BookingSummary::from_records(&booking.records, &AliasTable::bond_defaults());
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.unique_isins, vec!["NO0010894330"]);
    assert_eq!(summary.coupon_range, Some((9.25, 10.0)));
}
