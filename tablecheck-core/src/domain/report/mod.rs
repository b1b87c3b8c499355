// tablecheck-core/src/domain/report/mod.rs

pub mod check;

pub use check::{CheckResult, Rule, RuleCategory, Severity};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub pass: u64,
    pub warn: u64,
    pub fail: u64,
}

impl Summary {
    fn tally(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.severity {
                Severity::Pass => acc.pass += 1,
                Severity::Warn => acc.warn += 1,
                Severity::Fail => acc.fail += 1,
            }
            acc
        })
    }
}

/// Final report of one run. Field names are the machine-readable contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub dataset: String,
    pub version: String,
    pub run_timestamp: String,
    pub passed: bool,
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    /// Warnings never fail a run.
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.severity == severity)
    }
}

/// Per-run accumulator. Results grow during the run and are frozen by `finish`.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    results: Vec<CheckResult>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        self.results.extend(results);
    }

    pub fn finish(self, dataset: &str, version: &str, run_timestamp: String) -> ValidationReport {
        let mut results = self.results;
        // Stable: ties keep the order checks produced them in.
        results.sort_by(|a, b| {
            a.table
                .cmp(&b.table)
                .then(a.category().cmp(&b.category()))
                .then(a.column.cmp(&b.column))
        });

        let summary = Summary::tally(&results);
        ValidationReport {
            dataset: dataset.to_string(),
            version: version.to_string(),
            run_timestamp,
            passed: summary.fail == 0,
            summary,
            results,
        }
    }
}
