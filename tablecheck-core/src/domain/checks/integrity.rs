// tablecheck-core/src/domain/checks/integrity.rs
//
// File-level comparison against the published catalog (size and SHA-256).

use serde::{Deserialize, Serialize};

use crate::domain::report::{CheckResult, Rule};

/// What the catalog promises for one released file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// What is actually on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub size_bytes: u64,
    pub sha256: String,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn check(table: &str, expected: &CatalogEntry, actual: &FileFingerprint) -> Vec<CheckResult> {
        let mut results = Vec::new();

        if let Some(size) = expected.file_size_bytes {
            results.push(if size == actual.size_bytes {
                CheckResult::pass(Rule::CatalogSize, table, format!("File size {} bytes", size))
            } else {
                CheckResult::warn(
                    Rule::CatalogSize,
                    table,
                    format!(
                        "File size mismatch: expected {}, got {}",
                        size, actual.size_bytes
                    ),
                )
            });
        }

        if let Some(sha) = &expected.sha256 {
            results.push(if sha.eq_ignore_ascii_case(&actual.sha256) {
                CheckResult::pass(Rule::CatalogChecksum, table, "SHA-256 matches catalog")
            } else {
                CheckResult::warn(
                    Rule::CatalogChecksum,
                    table,
                    format!("SHA-256 mismatch for {}", expected.path),
                )
            });
        }

        results
    }
}
