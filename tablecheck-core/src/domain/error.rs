// tablecheck-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema not found: {path}")]
    #[diagnostic(
        code(tablecheck::domain::schema_not_found),
        help("Expected schemas/<dataset>/<version>/schema.yaml. Check the dataset id and version.")
    )]
    SchemaNotFound { path: String },

    #[error("Schema Error in {table}: {reason}")]
    #[diagnostic(code(tablecheck::domain::schema))]
    SchemaParse { table: String, reason: String },

    #[error("Data file not found: {0}")]
    #[diagnostic(code(tablecheck::domain::file_missing))]
    FileMissing(String),

    #[error("Could not read table '{table}': {reason}")]
    #[diagnostic(code(tablecheck::domain::table_parse))]
    TableParse { table: String, reason: String },

    #[error("No data files found for {dataset} (looked in {path})")]
    #[diagnostic(
        code(tablecheck::domain::no_tables),
        help("None of the tables declared in the schema has a CSV file on disk.")
    )]
    NoTablesFound { dataset: String, path: String },

    #[error("Unsafe dataset identifier: '{0}'")]
    #[diagnostic(
        code(tablecheck::domain::identifier),
        help("Dataset ids and versions may only contain letters, digits, '_', '-' and '.'.")
    )]
    UnsafeIdentifier(String),

    #[error("Catalog Error: {0}")]
    #[diagnostic(code(tablecheck::domain::catalog))]
    CatalogError(String),
}

impl DomainError {
    pub(crate) fn schema(table: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::SchemaParse {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
