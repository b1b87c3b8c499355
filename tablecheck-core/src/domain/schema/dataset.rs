// tablecheck-core/src/domain/schema/dataset.rs

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::table::TableSchema;
use crate::domain::error::DomainError;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$";

fn is_safe_identifier(value: &str) -> bool {
    Regex::new(IDENTIFIER_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// One `(dataset_id, version)` pair. Both parts are used as single path
/// components, so anything that could escape the repository layout is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetVersion {
    pub dataset_id: String,
    pub version: String,
}

impl DatasetVersion {
    pub fn new(dataset_id: impl Into<String>, version: impl Into<String>) -> Result<Self, DomainError> {
        let dataset_id = dataset_id.into();
        let version = version.into();
        for part in [&dataset_id, &version] {
            if !is_safe_identifier(part) {
                return Err(DomainError::UnsafeIdentifier(part.clone()));
            }
        }
        Ok(Self {
            dataset_id,
            version,
        })
    }
}

impl fmt::Display for DatasetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.dataset_id, self.version)
    }
}

/// Every table declared for one dataset version. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSchema {
    pub dataset: DatasetVersion,
    pub tables: Vec<TableSchema>,
}

impl DatasetSchema {
    /// Builds the schema and enforces the structural invariants: unique table
    /// and column names, required columns not nullable, well-formed ranges,
    /// and keys that only reference declared columns.
    pub fn new(dataset: DatasetVersion, tables: Vec<TableSchema>) -> Result<Self, DomainError> {
        let schema = Self { dataset, tables };
        schema.validate()?;
        Ok(schema)
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let mut table_names = HashSet::new();
        for table in &self.tables {
            // Table names become `<name>.csv` inside the version directory.
            if !is_safe_identifier(&table.name) {
                return Err(DomainError::schema(
                    &table.name,
                    "table names may only contain letters, digits, '_', '-' and '.'",
                ));
            }
            if !table_names.insert(table.name.as_str()) {
                return Err(DomainError::schema(&table.name, "table declared twice"));
            }
            validate_columns(table)?;
        }

        for table in &self.tables {
            for key_col in &table.primary_key {
                if !table.has_column(key_col) {
                    return Err(DomainError::schema(
                        &table.name,
                        format!("primary key references undeclared column '{}'", key_col),
                    ));
                }
            }

            for fk in &table.foreign_keys {
                if !table.has_column(&fk.column) {
                    return Err(DomainError::schema(
                        &table.name,
                        format!("foreign key on undeclared column '{}'", fk.column),
                    ));
                }
                let target = self.table(&fk.ref_table).ok_or_else(|| {
                    DomainError::schema(
                        &table.name,
                        format!("foreign key {} references undeclared table", fk),
                    )
                })?;
                if !target.has_column(&fk.ref_column) {
                    return Err(DomainError::schema(
                        &table.name,
                        format!("foreign key {} references undeclared column", fk),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn validate_columns(table: &TableSchema) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for col in &table.columns {
        if !seen.insert(col.name.as_str()) {
            return Err(DomainError::schema(
                &table.name,
                format!("duplicate column '{}'", col.name),
            ));
        }
        if col.required && col.nullable {
            return Err(DomainError::schema(
                &table.name,
                format!("column '{}' is required but declared nullable", col.name),
            ));
        }
        if let Some(range) = &col.range {
            if !col.column_type.is_numeric() {
                return Err(DomainError::schema(
                    &table.name,
                    format!(
                        "column '{}' declares a range but has type {}",
                        col.name, col.column_type
                    ),
                ));
            }
            if let (Some(min), Some(max)) = (range.min, range.max)
                && min > max
            {
                return Err(DomainError::schema(
                    &table.name,
                    format!("column '{}' has min {} greater than max {}", col.name, min, max),
                ));
            }
        }
    }
    Ok(())
}
