// tsrecon CLI - term sheet vs booking reconciliation

mod exit_codes;
mod inspect;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_LOAD, EXIT_REPORT, EXIT_SETTINGS, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tsrecon")]
#[command(about = "Reconcile extracted bond term sheets against booking records")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log verbosity: -v info, -vv debug, -vvv trace (TSRECON_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a term sheet against every record of a booking file
    #[command(after_help = "\
Examples:
  tsrecon run genel-energy.json Genel_Energy_Trades.json
  tsrecon run term_sheet.json bookings.csv --json
  tsrecon run term_sheet.json bookings.csv --date-tolerance 1 --out-dir reports
  tsrecon run term_sheet.json bookings.csv --no-reports --output result.json

Exit codes:
  0  every trade matched perfectly
  3  reconciliation finished with mismatches
  4  invalid settings, 5 input load failure, 6 report write failure")]
    Run {
        /// Extracted term sheet (JSON)
        term_sheet: PathBuf,

        /// Booking records (.csv or .json)
        booking: PathBuf,

        /// Settings file (default: <config dir>/tsrecon/settings.toml)
        #[arg(long, env = "TSRECON_CONFIG")]
        config: Option<PathBuf>,

        /// Report directory (overrides [output] dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip writing report files
        #[arg(long)]
        no_reports: bool,

        /// Output the batch result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the batch result JSON to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Allowed date difference in days
        #[arg(long, value_name = "DAYS")]
        date_tolerance: Option<i64>,

        /// Allowed relative numeric difference (0.001 = 0.1%)
        #[arg(long, value_name = "FRACTION")]
        numeric_tolerance: Option<f64>,

        /// Compare text fields ignoring case
        #[arg(long)]
        case_insensitive: bool,

        /// Only reconcile records carrying the term sheet's ISIN
        #[arg(long)]
        filter_isin: bool,
    },

    /// Summarize a booking file (ISINs, issuers, currencies, coupon range)
    #[command(after_help = "\
Examples:
  tsrecon summary Genel_Energy_Trades.json
  tsrecon summary bookings.csv --json")]
    Summary {
        /// Booking records (.csv or .json)
        booking: PathBuf,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective alias table
    #[command(after_help = "\
Examples:
  tsrecon aliases
  tsrecon aliases --config settings.toml")]
    Aliases {
        /// Settings file (default: <config dir>/tsrecon/settings.toml)
        #[arg(long, env = "TSRECON_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Validate a settings file without running
    #[command(after_help = "\
Examples:
  tsrecon validate settings.toml")]
    Validate {
        /// Path to the settings TOML file
        settings: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("TSRECON_GIT_HASH"), ")",
        "\nengine:  tsrecon-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TSRECON_TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TSRECON_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    // Also installs the `log` bridge, so library records reach the subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            term_sheet,
            booking,
            config,
            out_dir,
            no_reports,
            json,
            output,
            date_tolerance,
            numeric_tolerance,
            case_insensitive,
            filter_isin,
        } => recon::cmd_run(recon::RunArgs {
            term_sheet,
            booking,
            config,
            out_dir,
            no_reports,
            json,
            output,
            date_tolerance,
            numeric_tolerance,
            case_insensitive,
            filter_isin,
        }),
        Commands::Summary { booking, json } => inspect::cmd_summary(booking, json),
        Commands::Aliases { config } => inspect::cmd_aliases(config),
        Commands::Validate { settings } => recon::cmd_validate(settings),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn settings(err: tsrecon_config::SettingsError) -> Self {
        let hint = match &err {
            tsrecon_config::SettingsError::Io { .. } => {
                Some("pass an existing file with --config, or omit it to use defaults".to_string())
            }
            tsrecon_config::SettingsError::Parse(_) => {
                Some("check the file against `tsrecon validate <settings.toml>`".to_string())
            }
            tsrecon_config::SettingsError::Invalid(_) => None,
        };
        Self { code: EXIT_SETTINGS, message: err.to_string(), hint }
    }

    pub fn load(err: tsrecon_io::LoadError) -> Self {
        let hint = match &err {
            tsrecon_io::LoadError::UnsupportedFormat(_) => {
                Some("convert the booking export to CSV or JSON".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_LOAD, message: err.to_string(), hint }
    }

    pub fn report(err: tsrecon_io::ReportError) -> Self {
        Self::new(EXIT_REPORT, err.to_string())
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
