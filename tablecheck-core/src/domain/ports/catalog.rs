use std::collections::HashMap;

use crate::domain::checks::CatalogEntry;
use crate::domain::error::DomainError;
use crate::domain::schema::DatasetVersion;

pub trait CatalogSource: Send + Sync {
    /// Catalog entries for the version's files, keyed by file name. An absent
    /// catalog is an empty map.
    fn entries(&self, dataset: &DatasetVersion) -> Result<HashMap<String, CatalogEntry>, DomainError>;
}

/// Used when no catalog is configured.
pub struct NoCatalog;

impl CatalogSource for NoCatalog {
    fn entries(&self, _dataset: &DatasetVersion) -> Result<HashMap<String, CatalogEntry>, DomainError> {
        Ok(HashMap::new())
    }
}
