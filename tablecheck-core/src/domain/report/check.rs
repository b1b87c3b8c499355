// tablecheck-core/src/domain/report/check.rs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pass,
    Warn,
    Fail,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Existence,
    Integrity,
    Columns,
    Types,
    Nullability,
    Ranges,
    Keys,
    Referential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    FileExists,
    UnexpectedFile,
    RowShape,
    CatalogSize,
    CatalogChecksum,
    RequiredColumn,
    OptionalColumn,
    UnexpectedColumn,
    Dtype,
    NotNull,
    Range,
    PrimaryKey,
    ReferentialIntegrity,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileExists => "file_exists",
            Self::UnexpectedFile => "unexpected_file",
            Self::RowShape => "row_shape",
            Self::CatalogSize => "catalog_size",
            Self::CatalogChecksum => "catalog_checksum",
            Self::RequiredColumn => "required_column",
            Self::OptionalColumn => "optional_column",
            Self::UnexpectedColumn => "unexpected_column",
            Self::Dtype => "dtype",
            Self::NotNull => "not_null",
            Self::Range => "range",
            Self::PrimaryKey => "primary_key",
            Self::ReferentialIntegrity => "referential_integrity",
        }
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            Self::FileExists | Self::UnexpectedFile | Self::RowShape => {
                RuleCategory::Existence
            }
            Self::CatalogSize | Self::CatalogChecksum => RuleCategory::Integrity,
            Self::RequiredColumn | Self::OptionalColumn | Self::UnexpectedColumn => {
                RuleCategory::Columns
            }
            Self::Dtype => RuleCategory::Types,
            Self::NotNull => RuleCategory::Nullability,
            Self::Range => RuleCategory::Ranges,
            Self::PrimaryKey => RuleCategory::Keys,
            Self::ReferentialIntegrity => RuleCategory::Referential,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one rule evaluation. Violations of the same rule on the same
/// table and column are aggregated into a single result carrying a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub severity: Severity,
    pub rule: Rule,
    pub table: String,
    pub column: Option<String>,
    pub message: String,
    pub count: Option<u64>,
}

impl CheckResult {
    pub fn new(severity: Severity, rule: Rule, table: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule,
            table: table.to_string(),
            column: None,
            message: message.into(),
            count: None,
        }
    }

    pub fn pass(rule: Rule, table: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Pass, rule, table, message)
    }

    pub fn warn(rule: Rule, table: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, rule, table, message)
    }

    pub fn fail(rule: Rule, table: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Fail, rule, table, message)
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count as u64);
        self
    }

    pub fn category(&self) -> RuleCategory {
        self.rule.category()
    }
}
