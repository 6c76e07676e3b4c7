// Markdown reconciliation report

use std::fmt::Write as _;

use tsrecon_engine::{BatchResult, FieldComparisonResult, TradeResult};

/// Render the narrative report: header, summary, mismatch breakdown, then
/// one section per trade.
pub fn render(batch: &BatchResult) -> String {
    let mut out = String::new();

    out.push_str("# Term Sheet Reconciliation Report\n\n");
    let _ = writeln!(out, "**Term sheet:** {}  ", escape(batch.term_sheet_id()));
    let _ = writeln!(out, "**Booking source:** {}  ", escape(batch.booking_source_id()));
    let _ = writeln!(out, "**Engine version:** {}\n", batch.engine_version());

    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "- Total trades: {}", batch.total_trades());
    let _ = writeln!(out, "- Perfect matches: {}", batch.perfect_matches());
    let _ = writeln!(out, "- Success rate: {:.1}%\n", batch.success_rate() * 100.0);

    let counts = batch.field_mismatch_counts();
    if !counts.is_empty() {
        out.push_str("## Mismatches by Field\n\n");
        out.push_str("| Field | Trades with mismatch |\n|---|---|\n");
        for (field, count) in counts {
            let _ = writeln!(out, "| {} | {} |", field, count);
        }
        out.push('\n');
    }

    out.push_str("## Trades\n");
    for trade in batch.trades() {
        render_trade(&mut out, trade);
    }

    out
}

fn render_trade(out: &mut String, trade: &TradeResult) {
    let status = if trade.perfect_match() { "✅ MATCH" } else { "❌ MISMATCH" };
    let _ = writeln!(out, "\n### Trade {}: {}\n", escape(&trade.label()), status);
    let _ = writeln!(
        out,
        "{}/{} fields match ({:.1}%)\n",
        trade.matched_fields(),
        trade.compared_fields(),
        trade.match_percentage()
    );

    if trade.comparisons().is_empty() {
        out.push_str("_No term sheet fields to compare._\n");
        return;
    }

    out.push_str("| Field | Term Sheet | Booking | Booking Field | Match | Notes |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for c in trade.comparisons() {
        render_row(out, c);
    }
}

fn render_row(out: &mut String, c: &FieldComparisonResult) {
    let booking = c
        .booking_value
        .as_ref()
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "N/A".to_string());
    let key = c.booking_key.as_deref().map(escape).unwrap_or_default();
    let mark = if c.is_match { "✅" } else { "❌" };
    let note = c.note.as_deref().map(escape).unwrap_or_default();
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {} | {} |",
        c.field,
        escape(&c.term_sheet_value.to_string()),
        booking,
        key,
        mark,
        note
    );
}

fn escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
