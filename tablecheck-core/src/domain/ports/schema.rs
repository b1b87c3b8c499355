use crate::domain::error::DomainError;
use crate::domain::schema::{DatasetSchema, DatasetVersion};

pub trait SchemaSource: Send + Sync {
    /// Fails with `SchemaNotFound` when no declaration exists for the version
    /// and `SchemaParse` when it is malformed.
    fn load_schema(&self, dataset: &DatasetVersion) -> Result<DatasetSchema, DomainError>;
}
