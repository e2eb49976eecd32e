//! Render the HTML coverage dashboard from the summary written by
//! `parse_coverage`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coverage_monitor::dashboard::write_dashboard;
use coverage_monitor::{CoverageConfig, Summary};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "coverage_dashboard")]
#[command(about = "Generate the HTML coverage dashboard from the coverage summary")]
struct Args {
    /// Project root the summary and dashboard paths are relative to
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// TOML file overriding the output paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Summary JSON to read, relative to the project root (defaults to the
    /// configured path)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Dashboard HTML to write, relative to the project root (defaults to
    /// the configured path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => CoverageConfig::load(path)?,
        None => CoverageConfig::default(),
    };
    let summary_path = match &args.summary {
        Some(path) => args.project_root.join(path),
        None => config.summary_path_in(&args.project_root),
    };
    let html_path = match &args.output {
        Some(path) => args.project_root.join(path),
        None => config.dashboard_path_in(&args.project_root),
    };

    let summary = Summary::read_json(&summary_path)?;
    tracing::debug!(modules = summary.modules_total, "loaded coverage summary");

    write_dashboard(&summary, &html_path).context("Failed to write coverage dashboard")?;

    let absolute = html_path.canonicalize().unwrap_or_else(|_| html_path.clone());
    println!("Coverage dashboard generated: {}", html_path.display());
    println!("Open in browser: file://{}", absolute.display());
    Ok(())
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
