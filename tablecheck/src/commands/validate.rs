// tablecheck/src/commands/validate.rs
//
// USE CASE: Validate one dataset version and write its reports.

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};
use tablecheck_core::application::run_validation;
use tablecheck_core::domain::report::{Severity, ValidationReport};
use tablecheck_core::infrastructure::config::load_project_settings;

use super::{abort, resolve_repo};

pub fn execute(
    repo: Option<PathBuf>,
    dataset: String,
    version: String,
    no_write: bool,
) -> anyhow::Result<()> {
    let repo_root = resolve_repo(repo)?;
    let settings = match load_project_settings(&repo_root) {
        Ok(settings) => settings,
        Err(e) => abort(e.into()),
    };

    println!("🔎 Validating {} {}...", dataset, version);

    let outcome = match run_validation(&repo_root, &settings, &dataset, &version, !no_write) {
        Ok(outcome) => outcome,
        Err(e) => abort(e),
    };

    print_summary(&outcome.report);
    print_findings(&outcome.report);

    if let Some(paths) = &outcome.written {
        println!("📄 Reports written:");
        println!("   {}", paths.markdown.display());
        println!("   {}", paths.json.display());
    }

    if !outcome.report.passed() {
        eprintln!(
            "\n❌ FAILURE. {} check(s) failed.",
            outcome.report.summary.fail
        );
        std::process::exit(1);
    }

    println!(
        "\n✨ PASS ({} warning(s))",
        outcome.report.summary.warn
    );
    Ok(())
}

fn print_summary(report: &ValidationReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Severity", "Count"])
        .add_row(vec!["pass".to_string(), report.summary.pass.to_string()])
        .add_row(vec!["warn".to_string(), report.summary.warn.to_string()])
        .add_row(vec!["fail".to_string(), report.summary.fail.to_string()]);
    println!("{table}");
}

fn print_findings(report: &ValidationReport) {
    let findings: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.severity != Severity::Pass)
        .collect();
    if findings.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Severity", "Table", "Rule", "Column", "Count", "Message"]);
    for r in findings {
        table.add_row(vec![
            r.severity.to_string(),
            r.table.clone(),
            r.rule.to_string(),
            r.column.clone().unwrap_or_default(),
            r.count.map(|c| c.to_string()).unwrap_or_default(),
            r.message.clone(),
        ]);
    }
    println!("{table}");
}
