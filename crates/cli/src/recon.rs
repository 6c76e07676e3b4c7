//! `tsrecon run` and `tsrecon validate`.

use std::path::{Path, PathBuf};

use log::info;
use tsrecon_config::Settings;
use tsrecon_engine::{aggregate, ReconConfig, TextMatch};
use tsrecon_io::{console_summary, load_booking_file, load_term_sheet, report_base_name, write_reports};

use crate::exit_codes::EXIT_MISMATCHES;
use crate::CliError;

pub struct RunArgs {
    pub term_sheet: PathBuf,
    pub booking: PathBuf,
    pub config: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub no_reports: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub date_tolerance: Option<i64>,
    pub numeric_tolerance: Option<f64>,
    pub case_insensitive: bool,
    pub filter_isin: bool,
}

/// Explicit `--config` must exist; otherwise the per-user file is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    }
    .map_err(CliError::settings)
}

/// Settings-derived engine config with command-line overrides applied.
fn effective_config(settings: &Settings, args: &RunArgs) -> Result<ReconConfig, CliError> {
    let base = settings.recon_config().map_err(CliError::settings)?;

    let config = if args.date_tolerance.is_some() || args.numeric_tolerance.is_some() {
        ReconConfig::new(
            args.date_tolerance.unwrap_or(base.date_tolerance_days()),
            args.numeric_tolerance.unwrap_or(base.numeric_tolerance()),
        )
        .map_err(|e| {
            CliError::usage(e.to_string())
                .with_hint("tolerances must be >= 0, e.g. --date-tolerance 1 --numeric-tolerance 0.001")
        })?
        .with_text_match(base.text_match())
        .with_isin_filter(base.filter_by_isin())
    } else {
        base
    };

    let config = if args.case_insensitive {
        config.with_text_match(TextMatch::CaseInsensitive)
    } else {
        config
    };
    let filter = config.filter_by_isin() || args.filter_isin;
    Ok(config.with_isin_filter(filter))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let settings = load_settings(args.config.as_deref())?;
    let config = effective_config(&settings, &args)?;
    let aliases = settings.alias_table();

    let term_sheet = load_term_sheet(&args.term_sheet).map_err(CliError::load)?;
    if let Some(confidence) = term_sheet.confidence {
        info!("term sheet '{}' extraction confidence {:.2}", term_sheet.id, confidence);
    }
    let booking = load_booking_file(&args.booking).map_err(CliError::load)?;

    let batch = aggregate(
        &term_sheet.fields,
        &booking.records,
        &aliases,
        &config,
        &term_sheet.id,
        &booking.source_id,
    );

    if !args.no_reports {
        let dir = args.out_dir.as_deref().unwrap_or(settings.output.dir.as_path());
        let base_name = report_base_name(batch.term_sheet_id(), batch.booking_source_id());
        let written = write_reports(&batch, dir, &base_name, &settings.output.formats)
            .map_err(CliError::report)?;
        for path in written {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = args.output {
        tsrecon_io::json::export(&batch, path).map_err(CliError::report)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json_str = tsrecon_io::json::to_pretty_json(&batch).map_err(CliError::report)?;
        println!("{json_str}");
    }

    // Human summary to stderr
    eprint!("{}", console_summary(&batch));

    let imperfect = batch.total_trades() - batch.perfect_matches();
    if imperfect > 0 {
        return Err(CliError::new(
            EXIT_MISMATCHES,
            format!("{} of {} trades have mismatches", imperfect, batch.total_trades()),
        ));
    }
    Ok(())
}

pub fn cmd_validate(path: PathBuf) -> Result<(), CliError> {
    let settings = Settings::load(&path).map_err(CliError::settings)?;
    let config = settings.recon_config().map_err(CliError::settings)?;

    let formats: Vec<String> = settings.output.formats.iter().map(|f| f.to_string()).collect();
    eprintln!(
        "valid: date tolerance {} day(s), numeric tolerance {}, text {}, ISIN filter {}, \
         {} alias override(s), reports [{}] -> {}",
        config.date_tolerance_days(),
        config.numeric_tolerance(),
        config.text_match(),
        if config.filter_by_isin() { "on" } else { "off" },
        settings.aliases.len() + settings.extra_aliases.len(),
        formats.join(", "),
        settings.output.dir.display(),
    );
    Ok(())
}
