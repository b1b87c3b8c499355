// tablecheck-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum TablecheckError {
    // --- DOMAIN ERRORS (schema contract, structural aborts) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, settings) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl TablecheckError {
    /// True when the run stopped before any check could produce a result.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TablecheckError::Domain(
                DomainError::SchemaNotFound { .. }
                    | DomainError::SchemaParse { .. }
                    | DomainError::NoTablesFound { .. }
                    | DomainError::UnsafeIdentifier(_)
            )
        )
    }
}
