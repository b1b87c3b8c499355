// tablecheck-core/src/infrastructure/config/catalog.rs

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

use crate::domain::checks::CatalogEntry;
use crate::domain::error::DomainError;
use crate::domain::ports::CatalogSource;
use crate::domain::schema::DatasetVersion;
use crate::infrastructure::config::project::load_yaml;

// --- DTOs ---

#[derive(Debug, Deserialize, Default)]
pub struct CatalogFile {
    #[serde(default)]
    pub datasets: HashMap<String, CatalogDataset>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogDataset {
    #[serde(default)]
    pub files: Vec<CatalogEntry>,
}

/// Reads `catalog/datasets.yaml`. Entry paths are relative to the repository
/// root, e.g. `datasets/<id>/<version>/customers.csv`.
pub struct CatalogAdapter {
    catalog_path: PathBuf,
    datasets_path: String,
}

impl CatalogAdapter {
    pub fn new(catalog_path: impl Into<PathBuf>, datasets_path: &str) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            datasets_path: datasets_path.trim_end_matches('/').to_string(),
        }
    }
}

impl CatalogSource for CatalogAdapter {
    #[instrument(skip_all, fields(dataset = %dataset))]
    fn entries(&self, dataset: &DatasetVersion) -> Result<HashMap<String, CatalogEntry>, DomainError> {
        if !self.catalog_path.is_file() {
            debug!(path = ?self.catalog_path, "No catalog, integrity checks skipped");
            return Ok(HashMap::new());
        }

        let catalog: CatalogFile = load_yaml(&self.catalog_path).map_err(|e| {
            DomainError::CatalogError(format!("{}: {}", self.catalog_path.display(), e))
        })?;

        let prefix = format!(
            "{}/{}/{}/",
            self.datasets_path, dataset.dataset_id, dataset.version
        );
        let entries = catalog
            .datasets
            .get(&dataset.dataset_id)
            .map(|ds| ds.files.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| {
                let normalized = entry.path.replace('\\', "/");
                let file_name = normalized.strip_prefix(&prefix)?;
                if file_name.contains('/') {
                    return None;
                }
                Some((file_name.to_string(), entry.clone()))
            })
            .collect();

        Ok(entries)
    }
}
