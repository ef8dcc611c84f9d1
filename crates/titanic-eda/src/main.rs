//! CLI entry point for the Titanic EDA session.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use titanic_eda::{EdaConfig, EdaError, EdaReport, EdaSession, write_report_to_file};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis for the Titanic passenger dataset",
    long_about = "Finds train.csv and test.csv, cleans missing values, prints summary \
                  statistics and renders five charts.\n\n\
                  SEARCH ORDER (last match wins):\n  \
                  <working dir>, <program dir>, <working dir>/data, <program dir>/data\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Overrides the log filter\n\n\
                  EXAMPLES:\n  \
                  # Plain run from the competition directory\n  \
                  titanic-eda\n\n  \
                  # Search another directory, no charts\n  \
                  titanic-eda -d ~/kaggle/titanic --no-plots\n\n  \
                  # Machine-readable output\n  \
                  titanic-eda --json | jq .survival_by_sex"
)]
struct Args {
    /// Output directory for charts and the JSON report
    #[arg(short, long, default_value = "plots")]
    output: PathBuf,

    /// Search this directory instead of the working directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_plots: bool,

    /// Rows shown in the preview section
    #[arg(long, default_value = "5")]
    head_rows: usize,

    /// Output JSON to stdout instead of the console sections
    ///
    /// Disables all logs; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report is saved as titanic_eda_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress logs (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only the console sections. With
/// `json_output` logging is disabled entirely.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Args) -> std::result::Result<EdaConfig, EdaError> {
    let mut builder = EdaConfig::builder()
        .output_dir(&args.output)
        .head_rows(args.head_rows)
        .render_plots(!args.no_plots);

    if let Some(ref dir) = args.dir {
        builder = builder.working_dir(dir);
    }

    builder
        .build()
        .map_err(|e| EdaError::InvalidConfig(e.to_string()))
}

fn run(args: &Args) -> std::result::Result<EdaReport, EdaError> {
    let config = build_config(args)?;
    let session = EdaSession::new(config);

    if args.json {
        session.run(&mut io::sink())
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        session.run(&mut handle)
    }
}

fn emit(args: &Args, report: &EdaReport) -> Result<()> {
    if args.emit_report {
        let path = write_report_to_file(report, &args.output)?;
        info!("Detailed report written to: {}", path.display());
    }

    if args.json {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", serde_json::to_string_pretty(report)?)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let report = match run(&args) {
        Ok(report) => report,
        // The searched locations are already on stdout.
        Err(e) if e.is_missing_input() && !args.json => return ExitCode::FAILURE,
        Err(e) => {
            if args.json {
                eprintln!("{}", e);
            } else {
                error!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = emit(&args, &report) {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
