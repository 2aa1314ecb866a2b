//! Marker-driven test runner.
//!
//! `marktest <type-name> [-sort]` resolves a registered type, runs its
//! lifecycle, and reports every test result followed by a tally.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use marktest::core::comparator::sort_results;
use marktest::core::tally::Tally;
use marktest::exit_codes;
use marktest::io::config::{DEFAULT_CONFIG_FILE, ReportFormat, load_config};
use marktest::io::report::Reporter;
use marktest::logging;
use marktest::run::{RunOutcome, run_type};
use marktest::samples;

const USAGE: &str = "usage: marktest <type-name> [-sort]";

#[derive(Parser)]
#[command(
    name = "marktest",
    version,
    about = "Run the marked test procedures of a registered type"
)]
struct Cli {
    /// Fully-qualified name of the type under test.
    type_name: Option<String>,

    /// Report results ordered by status (PASSED, SKIPPED, ERROR, FAILED).
    #[arg(long)]
    sort: bool,

    /// Print registered type names and exit.
    #[arg(long)]
    list: bool,

    /// Report format; overrides the config file.
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Config file (defaults to `marktest.toml` in the working directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    match run(normalize_args(std::env::args_os())) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

/// Accept the single-dash `-sort` spelling alongside `--sort`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-sort" {
                OsString::from("--sort")
            } else {
                arg
            }
        })
        .collect()
}

fn run(args: Vec<OsString>) -> Result<i32> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            err.print().context("print usage")?;
            return Ok(if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            });
        }
    };

    let registry = samples::registry().context("register sample types")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        for name in registry.names() {
            writeln!(out, "{name}").context("write type list")?;
        }
        return Ok(exit_codes::OK);
    }

    let Some(type_name) = cli.type_name.as_deref() else {
        writeln!(out, "{USAGE}").context("write usage")?;
        return Ok(exit_codes::OK);
    };

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut cfg = load_config(&config_path).context("load config")?;
    if cli.sort {
        cfg.sort = true;
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    let reporter = Reporter::from(&cfg);

    match run_type(&registry, type_name) {
        Ok(RunOutcome::Completed(mut results)) => {
            if cfg.sort {
                sort_results(&mut results);
            }
            reporter.write(&mut out, type_name, &results)?;
            if Tally::from_results(&results).is_clean() {
                Ok(exit_codes::OK)
            } else {
                Ok(exit_codes::TESTS_FAILED)
            }
        }
        Ok(RunOutcome::Undiscoverable(failure)) => {
            eprintln!("error: {failure}");
            reporter.write(&mut out, type_name, &[])?;
            Ok(exit_codes::UNDISCOVERABLE)
        }
        Err(failure) => {
            let message = failure.to_string();
            let mut completed = failure.into_completed();
            if cfg.sort {
                sort_results(&mut completed);
            }
            reporter.write(&mut out, type_name, &completed)?;
            eprintln!("error: {message}");
            Ok(exit_codes::LIFECYCLE_FAILED)
        }
    }
}
