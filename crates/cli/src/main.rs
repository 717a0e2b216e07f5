// sheetclean - group order sheet rows by product and summarize sales

mod clean;
mod config_cmd;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sheetclean_engine::CleanError;
use tracing_subscriber::EnvFilter;

use exit_codes::{clean_exit_code, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sheetclean")]
#[command(about = "Clean an order sheet: group rows by product, total quantities, summarize")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a cleaned workbook (Cleaned + Summary sheets) for an order sheet
    #[command(after_help = "\
Examples:
  sheetclean clean orders.xlsx
  sheetclean clean orders.csv -o march_cleaned.xlsx
  sheetclean clean orders.xlsx --json > report.json
  sheetclean clean orders.xlsx --config ./settings.json -v")]
    Clean {
        /// Input file (xlsx, xlsm, xls, xlsb, ods, csv, tsv)
        input: PathBuf,

        /// Output path (default: <input stem><suffix>.xlsx in the output directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the run report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Settings file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suppress status lines on stderr
        #[arg(long, short = 'q')]
        quiet: bool,

        /// Debug logging (RUST_LOG overrides)
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Show how the header row is interpreted, without writing anything
    #[command(after_help = "\
Examples:
  sheetclean inspect orders.xlsx
  sheetclean inspect orders.csv --json")]
    Inspect {
        /// Input file
        input: PathBuf,

        /// Print the resolved header map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective settings, or write a default settings file
    #[command(after_help = "\
Examples:
  sheetclean config
  sheetclean config --init
  sheetclean config --init --path ./settings.json --force")]
    Config {
        /// Settings file (default: the per-user settings location)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Write default settings to the file
        #[arg(long)]
        init: bool,

        /// With --init, replace an existing file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("SHEETCLEAN_REVISION"), ")",
        "\nbuild:   ", env!("SHEETCLEAN_PROFILE"),
        "\ntarget:  ", env!("SHEETCLEAN_TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Already-installed subscriber is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            json,
            config,
            quiet,
            verbose,
        } => {
            init_logging(verbose);
            clean::cmd_clean(input, output, json, config, quiet)
        }
        Commands::Inspect { input, json } => {
            init_logging(false);
            clean::cmd_inspect(input, json)
        }
        Commands::Config { path, init, force } => {
            init_logging(false);
            config_cmd::cmd_config(path, init, force)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
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
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Create error from an engine/io error with the matching exit code.
    pub fn clean(err: CleanError) -> Self {
        let code = clean_exit_code(&err);
        let hint = match &err {
            CleanError::InputNotFound(_) => Some("check the path and file name".to_string()),
            CleanError::InputUnreadable(_) => {
                Some("supported inputs: xlsx, xlsm, xls, xlsb, ods, csv, tsv".to_string())
            }
            CleanError::MissingOrderIdColumn => {
                Some("the first row must contain an 'id' or 'order_id' header".to_string())
            }
            CleanError::NoProductColumnsFound => Some(
                "expected headers like productName, productName2, quantity, quantity2".to_string(),
            ),
            CleanError::Output(_) => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
