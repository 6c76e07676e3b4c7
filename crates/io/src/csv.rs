// CSV booking import and flat report export

use std::io::{Read, Write};
use std::path::Path;

use log::warn;
use tsrecon_engine::{BatchResult, BookingRecord, FieldComparisonResult, FieldValue, TradeResult};

use crate::error::{LoadError, ReportError};

pub const REPORT_HEADER: [&str; 11] = [
    "Trade_Index",
    "Trade_ID",
    "Overall_Match",
    "Match_Percentage",
    "Field_Name",
    "Booking_Field",
    "Term_Sheet_Value",
    "Booking_Value",
    "Field_Match",
    "Similarity",
    "Notes",
];

/// Load booking records from a CSV file. The delimiter is sniffed.
pub fn import(path: &Path) -> Result<Vec<BookingRecord>, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    parse_booking_csv(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts.first().copied().unwrap_or(0);
        if target <= 1 {
            continue;
        }

        // Lines agreeing with the header's field count, weighted by width
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| LoadError::io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            warn!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse booking records: the header row gives keys, empty cells are null,
/// short rows are padded with nulls.
pub fn parse_booking_csv(content: &str, delimiter: u8) -> Result<Vec<BookingRecord>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for (col, header) in headers.iter().enumerate() {
        if !header.is_empty() && headers[..col].contains(header) {
            warn!("duplicate column '{}', keeping the first non-empty cell", header);
        }
    }

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Csv(e.to_string()))?;
        if row.len() > headers.len() {
            warn!(
                "row {}: {} cells but only {} headers, extra cells ignored",
                row_idx + 2,
                row.len(),
                headers.len()
            );
        }

        let mut record = BookingRecord::new();
        for (col, header) in headers.iter().enumerate().filter(|(_, h)| !h.is_empty()) {
            if record.value(header).is_some() {
                continue;
            }
            let cell = row.get(col).filter(|c| !c.trim().is_empty());
            record.insert(header.clone(), cell.map(FieldValue::from));
        }
        records.push(record);
    }

    Ok(records)
}

/// Write the flat per-field report: one row per comparison, or a single row
/// with empty field columns for a trade with nothing compared.
pub fn write_report<W: Write>(batch: &BatchResult, writer: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| ReportError::Csv(e.to_string()))?;

    for trade in batch.trades() {
        if trade.comparisons().is_empty() {
            let row = trade_columns(trade)
                .into_iter()
                .chain(std::iter::repeat(String::new()).take(7));
            writer.write_record(row).map_err(|e| ReportError::Csv(e.to_string()))?;
            continue;
        }
        for comparison in trade.comparisons() {
            let row = trade_columns(trade).into_iter().chain(field_columns(comparison));
            writer.write_record(row).map_err(|e| ReportError::Csv(e.to_string()))?;
        }
    }

    writer.flush().map_err(|e| ReportError::Csv(e.to_string()))
}

pub fn export(batch: &BatchResult, path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::io(path, e))?;
    write_report(batch, std::io::BufWriter::new(file))
}

fn yes_no(flag: bool) -> String {
    let s = if flag { "YES" } else { "NO" };
    s.to_string()
}

fn trade_columns(trade: &TradeResult) -> [String; 4] {
    [
        trade.trade_index().to_string(),
        trade.trade_id().unwrap_or_default().to_string(),
        yes_no(trade.perfect_match()),
        format!("{:.1}%", trade.match_percentage()),
    ]
}

fn field_columns(c: &FieldComparisonResult) -> [String; 7] {
    [
        c.field.to_string(),
        c.booking_key.clone().unwrap_or_default(),
        c.term_sheet_value.to_string(),
        c.booking_value.as_ref().map(ToString::to_string).unwrap_or_default(),
        yes_no(c.is_match),
        format!("{:.3}", c.similarity),
        c.note.clone().unwrap_or_default(),
    ]
}
