//! Module map and output locations.
//!
//! The defaults mirror the SpiritAtlas Gradle layout. A TOML file can
//! replace any of them:
//!
//! ```toml
//! summary_path = "build/reports/coverage_summary.json"
//!
//! [[modules]]
//! name = "core:numerology"
//! path = "core/numerology/build/reports/jacoco/test/jacocoTestReport.xml"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CoverageError, CoverageResult};

const JVM_REPORT: &str = "build/reports/jacoco/test/jacocoTestReport.xml";
const ANDROID_REPORT: &str = "build/reports/jacoco/jacocoTestReport/jacocoTestReport.xml";

/// Where one module's report is expected, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleLocation {
    pub name: String,
    pub path: PathBuf,
}

impl ModuleLocation {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    pub modules: Vec<ModuleLocation>,
    pub summary_path: PathBuf,
    pub dashboard_path: PathBuf,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            modules: default_modules(),
            summary_path: PathBuf::from("build/reports/coverage_summary.json"),
            dashboard_path: PathBuf::from("build/reports/coverage_dashboard.html"),
        }
    }
}

fn default_modules() -> Vec<ModuleLocation> {
    let mut modules = Vec::new();

    // JVM modules
    for core in ["numerology", "astro", "ayurveda", "humandesign"] {
        modules.push(ModuleLocation::new(
            format!("core:{core}"),
            Path::new("core").join(core).join(JVM_REPORT),
        ));
    }
    modules.push(ModuleLocation::new(
        "domain",
        Path::new("domain").join(JVM_REPORT),
    ));

    // Android modules
    for (name, dir) in [
        ("data", "data"),
        ("feature:compatibility", "feature/compatibility"),
        ("feature:home", "feature/home"),
        ("feature:profile", "feature/profile"),
        ("feature:settings", "feature/settings"),
    ] {
        modules.push(ModuleLocation::new(name, Path::new(dir).join(ANDROID_REPORT)));
    }

    modules
}

impl CoverageConfig {
    /// Loads a TOML config; keys it omits keep their defaults.
    pub fn load(path: &Path) -> CoverageResult<Self> {
        let raw = fs::read_to_string(path).map_err(|err| CoverageError::io(path, err))?;
        Self::from_toml(&raw).map_err(|err| CoverageError::config(path, err))
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn summary_path_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.summary_path)
    }

    pub fn dashboard_path_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.dashboard_path)
    }
}
