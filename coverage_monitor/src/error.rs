use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::model::CounterKind;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed coverage report: {0}")]
    Xml(String),
    #[error("invalid `{attribute}` value {value:?} on {kind} counter")]
    InvalidCount {
        kind: CounterKind,
        attribute: &'static str,
        value: String,
    },
    #[error("summary parse error: {0}")]
    Summary(String),
    #[error("config error in {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("No coverage reports found. Run tests first: ./gradlew test")]
    NoReports,
    #[error("Failed to parse any coverage reports")]
    NoModulesParsed,
    #[error("Coverage summary not found: {0:?}. Run parse_coverage first")]
    SummaryNotFound(PathBuf),
}

pub type CoverageResult<T> = Result<T, CoverageError>;

impl CoverageError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn xml(details: impl fmt::Display) -> Self {
        Self::Xml(details.to_string())
    }

    pub fn config(path: impl Into<PathBuf>, details: impl fmt::Display) -> Self {
        Self::Config {
            path: path.into(),
            message: details.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoverageError {
    fn from(err: serde_json::Error) -> Self {
        CoverageError::Summary(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn coverage_error__io_constructor__then_preserves_path_and_source() {
        let err = CoverageError::io(
            "/tmp/jacocoTestReport.xml",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        let message = err.to_string();
        match &err {
            CoverageError::Io { path, source } => {
                assert!(path.display().to_string().ends_with("jacocoTestReport.xml"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(message.contains("jacocoTestReport.xml"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn coverage_error__xml_constructor__then_formats_message() {
        let err = CoverageError::xml("unexpected end of document");
        assert!(matches!(err, CoverageError::Xml(_)));
        assert!(format!("{err}").contains("unexpected end of document"));
    }

    #[test]
    fn coverage_error__from_serde_json_error__then_wraps_message() {
        let source: serde_json::Error = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err = CoverageError::from(source);
        assert!(matches!(err, CoverageError::Summary(_)));
        assert!(format!("{err}").contains("summary parse error"));
    }

    #[test]
    fn coverage_error__no_reports__then_tells_user_to_run_tests() {
        let message = CoverageError::NoReports.to_string();
        assert!(message.contains("No coverage reports found"));
        assert!(message.contains("./gradlew test"));
    }

    #[test]
    fn coverage_error__summary_not_found__then_points_at_parser() {
        let message =
            CoverageError::SummaryNotFound(PathBuf::from("build/reports/coverage_summary.json"))
                .to_string();
        assert!(message.contains("coverage_summary.json"));
        assert!(message.contains("parse_coverage"));
    }
}
