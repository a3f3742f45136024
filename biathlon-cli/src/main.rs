//! Biathlon Race Results CLI
//!
//! This is the command-line interface for the race results processor.
//! It uses the biathlon-core library and adds:
//! - Config file loading (JSON or TOML)
//! - Logging setup
//! - Report rendering (TXT/JSON) to stdout or a file

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

mod config;
mod report;

use report::OutputFormat;

/// Biathlon race results - build final standings from a race event log
#[derive(Parser, Debug)]
#[command(name = "biathlon-cli")]
#[command(about = "Build final standings from a biathlon race event log", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the race config (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,

    /// Path to the event log
    #[arg(short, long, value_name = "FILE", default_value = "events")]
    events: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Txt)]
    format: OutputFormat,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Biathlon results CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using core library v{}", biathlon_core::VERSION);

    let race_config = config::load_config(&args.config)?;
    log::info!("Configuration loaded: {:?}", args.config);

    let events = biathlon_core::load_events(&args.events)
        .with_context(|| format!("Failed to load event log: {:?}", args.events))?;

    let results = biathlon_core::process_race(&race_config, &events)
        .with_context(|| format!("Failed to process event log: {:?}", args.events))?;

    let rendered = report::render(&results, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Log level for the `-v` count; `-q` wins over any `-v`
fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Send race logs to stderr so stdout carries only the report
fn init_logging(verbose: u8, quiet: bool) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose, quiet))
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
