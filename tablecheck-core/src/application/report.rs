// tablecheck-core/src/application/report.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::report::{CheckResult, Severity, ValidationReport};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub const MARKDOWN_REPORT: &str = "validation_report.md";
pub const JSON_REPORT: &str = "validation_report.json";

const SECTIONS: [(Severity, &str); 3] = [
    (Severity::Fail, "Failures"),
    (Severity::Warn, "Warnings"),
    (Severity::Pass, "Passed"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
}

pub fn render_markdown(report: &ValidationReport) -> String {
    let status = if report.passed() { "PASS" } else { "FAIL" };
    let mut lines = vec![
        format!("# Validation Report: {} {}", report.dataset, report.version),
        String::new(),
        format!("- **Status:** {}", status),
        format!("- **Run:** {}", report.run_timestamp),
        String::new(),
        "| Severity | Count |".to_string(),
        "| --- | --- |".to_string(),
        format!("| pass | {} |", report.summary.pass),
        format!("| warn | {} |", report.summary.warn),
        format!("| fail | {} |", report.summary.fail),
    ];

    for (severity, title) in SECTIONS {
        let results: Vec<&CheckResult> = report.by_severity(severity).collect();
        if results.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("## {}", title));

        let mut current_table: Option<&str> = None;
        for result in results {
            if current_table != Some(result.table.as_str()) {
                lines.push(String::new());
                lines.push(format!("### {}", result.table));
                lines.push(String::new());
                current_table = Some(result.table.as_str());
            }
            lines.push(markdown_line(result));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn markdown_line(result: &CheckResult) -> String {
    let mut line = match &result.column {
        Some(column) => format!("- `{}` {}: {}", result.rule, column, result.message),
        None => format!("- `{}`: {}", result.rule, result.message),
    };
    if let Some(count) = result.count {
        line.push_str(&format!(" (count: {})", count));
    }
    line
}

pub fn render_json(report: &ValidationReport) -> Result<String, InfrastructureError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes both reports into `out_dir`, each one atomically.
#[instrument(skip(report))]
pub fn write_reports(report: &ValidationReport, out_dir: &Path) -> Result<ReportPaths, InfrastructureError> {
    let paths = ReportPaths {
        markdown: out_dir.join(MARKDOWN_REPORT),
        json: out_dir.join(JSON_REPORT),
    };

    atomic_write(&paths.json, render_json(report)?)?;
    atomic_write(&paths.markdown, render_markdown(report))?;

    info!(dir = ?out_dir, "Reports written");
    Ok(paths)
}
