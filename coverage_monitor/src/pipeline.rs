//! Collect → parse → aggregate, the part of `parse_coverage` that decides
//! whether there is anything to report at all.

use std::path::Path;

use tracing::warn;

use crate::collector::find_reports;
use crate::config::CoverageConfig;
use crate::error::{CoverageError, CoverageResult};
use crate::model::ModuleCoverage;
use crate::parser::{parse_located, ReportFailure};
use crate::summary::Summary;

/// Everything one parser run produced.
#[derive(Debug)]
pub struct CoverageRun {
    pub reports_found: usize,
    pub modules: Vec<ModuleCoverage>,
    pub failures: Vec<ReportFailure>,
    pub summary: Summary,
}

pub fn collect_and_summarize(
    project_root: &Path,
    config: &CoverageConfig,
) -> CoverageResult<CoverageRun> {
    let reports = find_reports(project_root, &config.modules);
    if reports.is_empty() {
        return Err(CoverageError::NoReports);
    }

    println!("Found {} coverage reports", reports.len());

    let mut modules = Vec::new();
    let mut failures = Vec::new();
    for report in &reports {
        println!("Parsing {}...", report.module);
        match parse_located(report) {
            Ok(module) => modules.push(module),
            Err(failure) => failures.push(failure),
        }
    }

    if modules.is_empty() {
        return Err(CoverageError::NoModulesParsed);
    }
    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            parsed = modules.len(),
            "some coverage reports were excluded"
        );
    }

    let summary = Summary::generate(&modules);
    Ok(CoverageRun {
        reports_found: reports.len(),
        modules,
        failures,
        summary,
    })
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::config::ModuleLocation;
    use std::fs;

    const REPORT: &str = r#"<report name="r"><package name="p">
<sourcefile name="A.kt"><counter type="LINE" missed="1" covered="9"/></sourcefile>
<counter type="LINE" missed="1" covered="9"/>
</package></report>"#;

    fn config(modules: &[(&str, &str)]) -> CoverageConfig {
        CoverageConfig {
            modules: modules
                .iter()
                .map(|(name, path)| ModuleLocation::new(*name, *path))
                .collect(),
            ..CoverageConfig::default()
        }
    }

    #[test]
    fn collect_and_summarize__no_reports__then_no_reports_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = collect_and_summarize(dir.path(), &config(&[("domain", "d.xml")])).unwrap_err();
        assert!(matches!(err, CoverageError::NoReports));
    }

    #[test]
    fn collect_and_summarize__only_malformed_reports__then_no_modules_parsed() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("d.xml"), "<report>").expect("write");
        let err = collect_and_summarize(dir.path(), &config(&[("domain", "d.xml")])).unwrap_err();
        assert!(matches!(err, CoverageError::NoModulesParsed));
    }

    #[test]
    fn collect_and_summarize__mixed_reports__then_failures_isolated() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("good.xml"), REPORT).expect("write good");
        fs::write(dir.path().join("bad.xml"), "not xml <").expect("write bad");

        let run = collect_and_summarize(
            dir.path(),
            &config(&[("bad", "bad.xml"), ("missing", "x.xml"), ("good", "good.xml")]),
        )
        .expect("run");

        assert_eq!(run.reports_found, 2);
        assert_eq!(run.modules.len(), 1);
        assert_eq!(run.modules[0].name, "good");
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].module, "bad");
        assert_eq!(run.summary.modules_total, 1);
        assert!((run.summary.total_line_coverage - 90.0).abs() < 1e-9);
    }
}
