//! HTML Dashboard generator for coverage summaries

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use quick_xml::escape::escape;

use crate::error::{CoverageError, CoverageResult};
use crate::model::THRESHOLD;
use crate::summary::{ModuleSummary, Summary};

const TEMPLATE: &str = include_str!("../dashboard_template.html");
const WARNING_FLOOR: f64 = 60.0;

/// Color band of a coverage figure; doubles as the CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Danger,
}

impl Status {
    pub fn for_coverage(percentage: f64) -> Self {
        if percentage >= THRESHOLD {
            Status::Success
        } else if percentage >= WARNING_FLOOR {
            Status::Warning
        } else {
            Status::Danger
        }
    }

    pub fn as_css_class(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Danger => "danger",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css_class())
    }
}

/// Render the dashboard page. Same summary in, same bytes out.
pub fn render(summary: &Summary) -> String {
    let overall = summary.total_line_coverage;
    let branch = summary.total_branch_coverage;
    let modules_percentage = if summary.modules_total > 0 {
        summary.modules_passing_80 as f64 / summary.modules_total as f64 * 100.0
    } else {
        0.0
    };
    let modules_status = if summary.modules_passing_80 == summary.modules_total {
        Status::Success
    } else {
        Status::Warning
    };

    let mut sorted: Vec<&ModuleSummary> = summary.modules.iter().collect();
    sorted.sort_by(|a, b| b.line_coverage.total_cmp(&a.line_coverage));

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("TIMESTAMP", display_timestamp(&summary.timestamp));
    values.insert("OVERALL_COVERAGE", format!("{overall:.1}"));
    values.insert("OVERALL_WIDTH", overall.to_string());
    values.insert("OVERALL_STATUS", Status::for_coverage(overall).to_string());
    values.insert("BRANCH_COVERAGE", format!("{branch:.1}"));
    values.insert("BRANCH_WIDTH", branch.to_string());
    values.insert("BRANCH_STATUS", Status::for_coverage(branch).to_string());
    values.insert("MODULES_PASSING", summary.modules_passing_80.to_string());
    values.insert("MODULES_TOTAL", summary.modules_total.to_string());
    values.insert("MODULES_PERCENTAGE", format!("{modules_percentage:.0}"));
    values.insert("MODULES_STATUS", modules_status.to_string());
    values.insert("THRESHOLD", format!("{THRESHOLD:.0}"));
    values.insert("MODULE_BARS", module_bars(&sorted));
    values.insert("MODULE_ROWS", module_rows(&sorted));

    fill_placeholders(TEMPLATE, &values)
}

/// Render and write the dashboard, creating parent directories as needed.
pub fn write_dashboard(summary: &Summary, path: &Path) -> CoverageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| CoverageError::io(parent, err))?;
    }
    fs::write(path, render(summary)).map_err(|err| CoverageError::io(path, err))
}

/// Reformat the persisted timestamp for display. Accepts RFC 3339 and naive
/// ISO-8601; anything else is shown as-is.
fn display_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(DISPLAY).to_string();
    }
    escape(raw).into_owned()
}

fn module_bars(modules: &[&ModuleSummary]) -> String {
    let mut html = String::new();
    for module in modules {
        let coverage = module.line_coverage;
        html.push_str(&format!(
            r#"
                <div class="bar-row">
                    <div class="bar-label">{name}</div>
                    <div class="bar">
                        <div class="threshold-line"></div>
                        <div class="bar-fill {status}" style="width: {coverage}%">{coverage:.1}%</div>
                    </div>
                </div>"#,
            name = escape(module.name.as_str()),
            status = Status::for_coverage(coverage),
        ));
    }
    html
}

fn module_rows(modules: &[&ModuleSummary]) -> String {
    let mut html = String::new();
    for module in modules {
        let (badge, label) = if module.meets_threshold {
            (Status::Success, "✓ PASS")
        } else {
            (Status::Danger, "✗ FAIL")
        };
        html.push_str(&format!(
            r#"
                    <tr>
                        <td class="module-name">{name}</td>
                        <td><span class="coverage-badge {line_status}">{line:.1}%</span></td>
                        <td><span class="coverage-badge {branch_status}">{branch:.1}%</span></td>
                        <td>{low_files}</td>
                        <td><span class="coverage-badge {badge}">{label}</span></td>
                    </tr>"#,
            name = escape(module.name.as_str()),
            line_status = Status::for_coverage(module.line_coverage),
            line = module.line_coverage,
            branch_status = Status::for_coverage(module.branch_coverage),
            branch = module.branch_coverage,
            low_files = module.low_coverage_files_count,
        ));
    }
    html
}

/// Substitute `{{KEY}}` markers in a single pass, so values that happen to
/// contain marker text are never expanded again. Unknown markers are kept.
fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after
            .find("}}")
            .and_then(|end| values.get(&after[..end]).map(|value| (end, value)))
        {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
