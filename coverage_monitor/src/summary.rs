//! Cross-module reduction and its JSON persistence.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{CoverageError, CoverageResult};
use crate::model::{meets_threshold, Counter, ModuleCoverage};

/// One row of the summary, as persisted and as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub name: String,
    pub line_coverage: f64,
    pub branch_coverage: f64,
    pub meets_threshold: bool,
    pub low_coverage_files_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub timestamp: String,
    pub total_line_coverage: f64,
    pub total_branch_coverage: f64,
    pub modules_passing_80: usize,
    pub modules_total: usize,
    pub modules: Vec<ModuleSummary>,
}

impl Summary {
    /// Reduces module records into a summary stamped with the current local time.
    pub fn generate(modules: &[ModuleCoverage]) -> Self {
        Self::generate_at(modules, Local::now())
    }

    /// Overall percentages weight every module by its own size: they are
    /// computed from the summed counters, not averaged per module.
    pub fn generate_at<Tz>(modules: &[ModuleCoverage], at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let line: Counter = modules.iter().map(|m| m.counters.line).sum();
        let branch: Counter = modules.iter().map(|m| m.counters.branch).sum();

        Self {
            timestamp: at.to_rfc3339(),
            total_line_coverage: line.percentage(),
            total_branch_coverage: branch.percentage(),
            modules_passing_80: modules.iter().filter(|m| m.meets_threshold()).count(),
            modules_total: modules.len(),
            modules: modules.iter().map(ModuleSummary::from_module).collect(),
        }
    }

    pub fn meets_threshold(&self) -> bool {
        meets_threshold(self.total_line_coverage)
    }

    /// Writes pretty JSON, creating parent directories and replacing any previous file.
    pub fn write_json(&self, path: &Path) -> CoverageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| CoverageError::io(parent, err))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|err| CoverageError::io(path, err))
    }

    pub fn read_json(path: &Path) -> CoverageResult<Self> {
        if !path.exists() {
            return Err(CoverageError::SummaryNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|err| CoverageError::io(path, err))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl ModuleSummary {
    fn from_module(module: &ModuleCoverage) -> Self {
        Self {
            name: module.name.clone(),
            line_coverage: round2(module.line_percentage()),
            branch_coverage: round2(module.branch_percentage()),
            meets_threshold: module.meets_threshold(),
            low_coverage_files_count: module.low_coverage_files().len(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
