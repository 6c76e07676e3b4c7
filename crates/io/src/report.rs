// Report output: file set for a batch and the console summary

use std::fmt;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};
use tsrecon_engine::BatchResult;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Csv,
    Markdown,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Csv, ReportFormat::Markdown, ReportFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}' (expected csv, markdown or json)", other)),
        }
    }
}

/// `reconciliation_<term sheet>_<booking file stem>`, with path-hostile
/// characters replaced.
pub fn report_base_name(term_sheet_id: &str, booking_source_id: &str) -> String {
    let stem = Path::new(booking_source_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| booking_source_id.to_string());
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    };
    format!("reconciliation_{}_{}", clean(term_sheet_id), clean(&stem))
}

/// Write one file per requested format into `dir` (created if missing).
/// Returns the written paths in format order.
pub fn write_reports(
    batch: &BatchResult,
    dir: &Path,
    base_name: &str,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;

    let mut formats = formats.to_vec();
    formats.sort();
    formats.dedup();

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = dir.join(format!("{}.{}", base_name, format.extension()));
        match format {
            ReportFormat::Csv => crate::csv::export(batch, &path)?,
            ReportFormat::Markdown => {
                std::fs::write(&path, crate::markdown::render(batch))
                    .map_err(|e| ReportError::io(&path, e))?
            }
            ReportFormat::Json => crate::json::export(batch, &path)?,
        }
        info!("wrote {} report to {}", format, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Plain-text summary for the terminal: totals, one line per trade and one
/// indented line per mismatched field.
pub fn console_summary(batch: &BatchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Term sheet:      {}", batch.term_sheet_id());
    let _ = writeln!(out, "Booking source:  {}", batch.booking_source_id());
    let _ = writeln!(out, "Total trades:    {}", batch.total_trades());
    let _ = writeln!(out, "Perfect matches: {}", batch.perfect_matches());
    let _ = writeln!(out, "Success rate:    {:.1}%", batch.success_rate() * 100.0);

    if !batch.trades().is_empty() {
        out.push('\n');
    }
    for trade in batch.trades() {
        let mark = if trade.perfect_match() { "✓" } else { "✗" };
        let _ = writeln!(out, "{} {}", mark, trade.summary());
        for c in trade.mismatches() {
            let _ = writeln!(out, "    {}: {}", c.field, c.note.as_deref().unwrap_or("mismatch"));
        }
    }
    out
}
