// restodup - restaurant catalog deduplication from the command line

mod audit;
mod dedup;
mod exit_codes;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "restodup")]
#[command(about = "Detect, evaluate and merge duplicate restaurant records")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detection, evaluation and merge from a TOML config file
    #[command(after_help = "\
Examples:
  restodup run restaurants.dedup.toml
  restodup run restaurants.dedup.toml --json
  restodup run restaurants.dedup.toml --output report.json
  RUST_LOG=debug restodup run restaurants.dedup.toml")]
    Run {
        /// Path to the .dedup.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of the per-strategy report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides [output].json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  restodup validate restaurants.dedup.toml")]
    Validate {
        /// Path to the .dedup.toml config file
        config: PathBuf,
    },

    /// Survey raw field values the normalization rules look at
    #[command(after_help = "\
Examples:
  restodup audit restaurants.tsv
  restodup audit restaurants.tsv --json | jq '.phone_formats'")]
    Audit {
        /// Tab-separated catalog
        records: PathBuf,

        /// Output JSON instead of the text survey
        #[arg(long)]
        json: bool,
    },

    /// Apply the normalization rules and write the catalog back out
    #[command(after_help = "\
Examples:
  restodup normalize restaurants.tsv
  restodup normalize restaurants.tsv -o restaurants_normalized.tsv")]
    Normalize {
        /// Tab-separated catalog
        records: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  restodup-resolve ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  restodup-resolve ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output } => dedup::cmd_run(config, json, output),
        Commands::Validate { config } => dedup::cmd_validate(config),
        Commands::Audit { records, json } => audit::cmd_audit(records, json),
        Commands::Normalize { records, output } => audit::cmd_normalize(records, output),
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
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Map an engine error to its exit code, with a hint where one helps.
    pub fn dedup(err: restodup_resolve::DedupError) -> Self {
        use restodup_resolve::DedupError;

        let code = exit_codes::dedup_exit_code(&err);
        let hint = match &err {
            DedupError::InvalidIdentifier { .. } => {
                Some("ids must run 1, 2, 3, ... in file order".to_string())
            }
            DedupError::UndefinedMetric { metric: "precision", .. } => {
                Some("the strategy found no pairs; drop it from [detection].strategies".to_string())
            }
            DedupError::UndefinedMetric { metric: "recall", .. } => {
                Some("check that the gold file lists at least one pair".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
