//! Locates the JaCoCo report of every configured module.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ModuleLocation;

/// A report that exists on disk, paired with the module it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocation {
    pub module: String,
    pub path: PathBuf,
}

/// Returns the reports that exist under `project_root`, in configuration order.
///
/// A missing report is not an error: the module simply has not been tested yet.
pub fn find_reports(project_root: &Path, modules: &[ModuleLocation]) -> Vec<ReportLocation> {
    modules
        .iter()
        .filter_map(|location| {
            let path = project_root.join(&location.path);
            if path.is_file() {
                Some(ReportLocation {
                    module: location.name.clone(),
                    path,
                })
            } else {
                debug!(module = %location.name, path = %path.display(), "no coverage report");
                None
            }
        })
        .collect()
}
