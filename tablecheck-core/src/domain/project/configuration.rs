// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::checks::{DEFAULT_ORPHAN_THRESHOLD, DEFAULT_SAMPLE_SIZE};
use crate::domain::table::DEFAULT_NULL_MARKERS;

/// Repository-level settings (`tablecheck.yaml`). Every field has a default,
/// so the file itself is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct ProjectSettings {
    #[serde(rename = "schemas-path", default = "default_schemas_path")]
    pub schemas_path: String,

    #[serde(rename = "datasets-path", default = "default_datasets_path")]
    pub datasets_path: String,

    #[serde(rename = "artifacts-path", default = "default_artifacts_path")]
    pub artifacts_path: String,

    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "orphan-threshold", default = "default_orphan_threshold")]
    pub orphan_threshold: f64,

    #[validate(range(min = 1))]
    #[serde(rename = "sample-size", default = "default_sample_size")]
    pub sample_size: usize,

    #[serde(rename = "null-markers", default = "default_null_markers")]
    pub null_markers: Vec<String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            schemas_path: default_schemas_path(),
            datasets_path: default_datasets_path(),
            artifacts_path: default_artifacts_path(),
            catalog_path: default_catalog_path(),
            orphan_threshold: default_orphan_threshold(),
            sample_size: default_sample_size(),
            null_markers: default_null_markers(),
        }
    }
}

fn default_schemas_path() -> String {
    "schemas".to_string()
}
fn default_datasets_path() -> String {
    "datasets".to_string()
}
fn default_artifacts_path() -> String {
    "artifacts/validation".to_string()
}
fn default_catalog_path() -> String {
    "catalog/datasets.yaml".to_string()
}
fn default_orphan_threshold() -> f64 {
    DEFAULT_ORPHAN_THRESHOLD
}
fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}
fn default_null_markers() -> Vec<String> {
    DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect()
}
