//! # Coverage Monitor for SpiritAtlas
//!
//! Aggregates the JaCoCo XML reports of every Gradle module into one
//! summary, gates the build on an 80% line-coverage threshold and renders a
//! static HTML dashboard.
//!
//! ## Pipeline
//!
//! 1. [`collector::find_reports`] resolves the configured module map against
//!    the project root and keeps the reports that exist.
//! 2. [`pipeline::collect_and_summarize`] runs [`parser::parse_located`] on
//!    each report to get a [`model::ModuleCoverage`]; a broken report is
//!    logged and skipped.
//! 3. [`summary::Summary::generate`] reduces the modules, weighting every
//!    module by its size.
//! 4. The summary is persisted as JSON and later rendered by
//!    [`dashboard::render`].
//!
//! ## Usage
//!
//! ```bash
//! ./gradlew test
//! parse_coverage --project-root .      # exits 1 below 80%
//! coverage_dashboard --project-root .
//! ```

pub mod collector;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use config::{CoverageConfig, ModuleLocation};
pub use error::{CoverageError, CoverageResult};
pub use model::{Counter, CounterKind, Counters, FileCoverage, ModuleCoverage, THRESHOLD};
pub use summary::{ModuleSummary, Summary};
