//! Human-readable console report printed by `parse_coverage`.

use colored::Colorize;

use crate::model::{ModuleCoverage, THRESHOLD};
use crate::summary::Summary;

const RULE_WIDTH: usize = 70;

/// Renders the banner, module table and low-coverage file listing.
pub fn render_text_report(modules: &[ModuleCoverage], summary: &Summary) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{heavy}\n"));
    out.push_str("  SpiritAtlas Test Coverage Report\n");
    out.push_str(&format!("{heavy}\n\n"));

    out.push_str(&format!(
        "Overall Line Coverage: {:.1}%\n",
        summary.total_line_coverage
    ));
    out.push_str(&format!(
        "Modules Meeting {THRESHOLD:.0}% Threshold: {}/{}\n",
        summary.modules_passing_80, summary.modules_total
    ));
    out.push('\n');

    out.push_str("Module Coverage:\n");
    out.push_str(&format!("{light}\n"));
    out.push_str(&format!(
        "{:<30} {:>10} {:>10} {:>12}\n",
        "Module", "Line %", "Branch %", "Status"
    ));
    out.push_str(&format!("{light}\n"));

    let mut by_coverage: Vec<&ModuleCoverage> = modules.iter().collect();
    by_coverage.sort_by(|a, b| b.line_percentage().total_cmp(&a.line_percentage()));
    for module in by_coverage {
        let status = if module.meets_threshold() {
            format!("{:>12}", "✓ PASS").green()
        } else {
            format!("{:>12}", "✗ FAIL").red()
        };
        out.push_str(&format!(
            "{:<30} {:>9.1}% {:>9.1}% {}\n",
            module.name,
            module.line_percentage(),
            module.branch_percentage(),
            status
        ));
    }
    out.push_str(&format!("{light}\n\n"));

    let with_low_files: Vec<&ModuleCoverage> = modules
        .iter()
        .filter(|m| !m.low_coverage_files().is_empty())
        .collect();
    if !with_low_files.is_empty() {
        out.push_str(&format!("Files with < {THRESHOLD:.0}% Coverage:\n"));
        out.push_str(&format!("{light}\n"));
        for module in with_low_files {
            out.push_str(&format!("\n{}:\n", module.name));
            let mut files = module.low_coverage_files();
            files.sort_by(|a, b| a.line_percentage().total_cmp(&b.line_percentage()));
            for file in files {
                out.push_str(&format!(
                    "  {:<50} {:>6.1}%\n",
                    file.name,
                    file.line_percentage()
                ));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("{heavy}\n"));
    out
}

/// The final pass/fail line that accompanies the exit code.
pub fn render_verdict(summary: &Summary) -> String {
    let coverage = summary.total_line_coverage;
    if summary.meets_threshold() {
        format!("✓ Overall coverage ({coverage:.1}%) meets {THRESHOLD:.0}% threshold")
            .green()
            .to_string()
    } else {
        format!("✗ Overall coverage ({coverage:.1}%) is below {THRESHOLD:.0}% threshold")
            .red()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::model::{Counter, Counters, FileCoverage};
    use chrono::{TimeZone, Utc};

    fn lines(missed: u64, covered: u64) -> Counters {
        Counters {
            line: Counter::new(missed, covered),
            ..Counters::default()
        }
    }

    fn fixture() -> (Vec<ModuleCoverage>, Summary) {
        let modules = vec![
            ModuleCoverage::new(
                "feature:home",
                lines(40, 60),
                vec![
                    FileCoverage::new("HomeScreen.kt", lines(5, 5)),
                    FileCoverage::new("HomeViewModel.kt", lines(9, 1)),
                    FileCoverage::new("HomeState.kt", lines(0, 10)),
                ],
            ),
            ModuleCoverage::new("core:numerology", lines(5, 95), Vec::new()),
        ];
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let summary = Summary::generate_at(&modules, at);
        (modules, summary)
    }

    #[test]
    fn render_text_report__modules__then_sorted_by_descending_line_coverage() {
        colored::control::set_override(false);
        let (modules, summary) = fixture();

        let report = render_text_report(&modules, &summary);

        let numerology = report.find("core:numerology").expect("numerology row");
        let home = report.find("feature:home").expect("home row");
        assert!(numerology < home);
        assert!(report.contains("Overall Line Coverage: 77.5%"));
        assert!(report.contains("Modules Meeting 80% Threshold: 1/2"));
        assert!(report.contains("✓ PASS"));
        assert!(report.contains("✗ FAIL"));
    }

    #[test]
    fn render_text_report__low_files__then_listed_ascending_by_coverage() {
        colored::control::set_override(false);
        let (modules, summary) = fixture();

        let report = render_text_report(&modules, &summary);

        assert!(report.contains("Files with < 80% Coverage:"));
        let worst = report.find("HomeViewModel.kt").expect("worst file");
        let next = report.find("HomeScreen.kt").expect("next file");
        assert!(worst < next);
        assert!(!report.contains("HomeState.kt"));
    }

    #[test]
    fn render_text_report__no_low_files__then_section_omitted() {
        colored::control::set_override(false);
        let modules = vec![ModuleCoverage::new(
            "domain",
            lines(0, 10),
            vec![FileCoverage::new("A.kt", lines(0, 10))],
        )];
        let summary = Summary::generate_at(&modules, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());

        let report = render_text_report(&modules, &summary);
        assert!(!report.contains("Files with <"));
    }

    #[test]
    fn render_text_report__layout__then_banner_first_and_heavy_rule_last() {
        colored::control::set_override(false);
        let (modules, summary) = fixture();

        let report = render_text_report(&modules, &summary);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(RULE_WIDTH));
        assert_eq!(lines[2], "  SpiritAtlas Test Coverage Report");
        assert_eq!(lines.last().copied(), Some("=".repeat(RULE_WIDTH).as_str()));
        assert!(report.ends_with('\n'));
        assert!(report.contains("\nfeature:home:\n"));
    }

    #[test]
    fn render_verdict__below_threshold__then_reports_failure() {
        colored::control::set_override(false);
        let (_, summary) = fixture();
        assert_eq!(
            render_verdict(&summary),
            "✗ Overall coverage (77.5%) is below 80% threshold"
        );
    }

    #[test]
    fn render_verdict__at_threshold__then_reports_success() {
        colored::control::set_override(false);
        let modules = vec![ModuleCoverage::new("domain", lines(20, 80), Vec::new())];
        let summary = Summary::generate_at(&modules, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            render_verdict(&summary),
            "✓ Overall coverage (80.0%) meets 80% threshold"
        );
    }
}
