//! Parse the JaCoCo reports of every module, persist the summary and gate
//! the build.
//!
//! Exits with status 1 when overall line coverage is below 80%, or when no
//! report could be found or parsed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use coverage_monitor::pipeline::collect_and_summarize;
use coverage_monitor::report::{render_text_report, render_verdict};
use coverage_monitor::CoverageConfig;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "parse_coverage")]
#[command(about = "Aggregate JaCoCo coverage reports and check the 80% threshold")]
struct Args {
    /// Project root the module report paths are relative to
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// TOML file overriding the module map and output paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSON summary, relative to the project root
    /// (defaults to the configured path)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => CoverageConfig::load(path)?,
        None => CoverageConfig::default(),
    };

    let run = collect_and_summarize(&args.project_root, &config)?;

    let summary_path = match &args.summary {
        Some(path) => args.project_root.join(path),
        None => config.summary_path_in(&args.project_root),
    };
    run.summary
        .write_json(&summary_path)
        .context("Failed to save coverage summary")?;
    println!("\nCoverage data saved to: {}", summary_path.display());

    print!("{}", render_text_report(&run.modules, &run.summary));
    println!();
    println!("{}", render_verdict(&run.summary));

    if run.summary.meets_threshold() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
