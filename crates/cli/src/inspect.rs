//! `tsrecon summary` and `tsrecon aliases`.

use std::io::{self, Write};
use std::path::PathBuf;

use tsrecon_io::{load_booking_file, BookingSummary};

use crate::recon::load_settings;
use crate::CliError;

pub fn cmd_summary(booking: PathBuf, json: bool) -> Result<(), CliError> {
    let settings = load_settings(None)?;
    let dataset = load_booking_file(&booking).map_err(CliError::load)?;
    let summary = BookingSummary::from_records(&dataset.records, &settings.alias_table());

    let out = if json {
        serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?
    } else {
        format!("Booking source: {}\n{}", dataset.source_id, summary)
    };
    write_stdout(&out)
}

pub fn cmd_aliases(config: Option<PathBuf>) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let table = settings.alias_table();

    let width = table.iter().map(|(canonical, _)| canonical.len()).max().unwrap_or(0);
    let lines: Vec<String> = table
        .iter()
        .map(|(canonical, aliases)| format!("{:width$}  {}", canonical, aliases.join(", ")))
        .collect();
    write_stdout(&lines.join("\n"))
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::general(e.to_string()))
}
