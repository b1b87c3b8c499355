// tablecheck-core/src/infrastructure/config/project.rs

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::project::ProjectSettings;
use crate::infrastructure::error::InfrastructureError;

const SETTINGS_CANDIDATES: [&str; 2] = ["tablecheck.yaml", "tablecheck.yml"];
const MAX_ROOT_SEARCH_DEPTH: usize = 5;

// --- LOADER ---

/// Loads `tablecheck.yaml` from the repository root when present, falls back to
/// defaults otherwise, then layers environment overrides on top.
#[instrument(skip(repo_root))]
pub fn load_project_settings(repo_root: &Path) -> Result<ProjectSettings, InfrastructureError> {
    let mut settings = match find_settings_file(repo_root) {
        Some(path) => {
            info!(path = ?path, "Loading project settings");
            let settings: ProjectSettings = load_yaml(&path)?;
            settings
                .validate()
                .map_err(|source| InfrastructureError::InvalidSettings {
                    path: path.display().to_string(),
                    source,
                })?;
            settings
        }
        None => {
            debug!("No settings file, using defaults");
            ProjectSettings::default()
        }
    };

    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

fn find_settings_file(root: &Path) -> Option<PathBuf> {
    SETTINGS_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

/// Reads and deserializes one YAML document.
pub(crate) fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(InfrastructureError::YamlError)
}

// Lets CI redirect reports without editing the settings file:
// TABLECHECK_ARTIFACTS_PATH=/tmp/reports tablecheck validate ...
fn apply_env_overrides(settings: &mut ProjectSettings) -> Result<(), InfrastructureError> {
    if let Ok(val) = std::env::var("TABLECHECK_ARTIFACTS_PATH") {
        info!(old = ?settings.artifacts_path, new = ?val, "Overriding artifacts path via ENV");
        settings.artifacts_path = val;
    }
    if let Ok(val) = std::env::var("TABLECHECK_ORPHAN_THRESHOLD") {
        let threshold: f64 = val.parse().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "TABLECHECK_ORPHAN_THRESHOLD is not a number: {}",
                val
            ))
        })?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(InfrastructureError::ConfigError(format!(
                "TABLECHECK_ORPHAN_THRESHOLD must be within [0, 1], got {}",
                threshold
            )));
        }
        info!(old = settings.orphan_threshold, new = threshold, "Overriding orphan threshold via ENV");
        settings.orphan_threshold = threshold;
    }
    Ok(())
}

// --- REPOSITORY DISCOVERY ---

/// Walks up from `start` looking for a directory holding both `schemas/` and
/// `datasets/`. Falls back to `start` itself.
pub fn find_repo_root(start: &Path) -> PathBuf {
    let mut current = Some(start);
    for _ in 0..=MAX_ROOT_SEARCH_DEPTH {
        let Some(dir) = current else {
            break;
        };
        if dir.join("schemas").is_dir() && dir.join("datasets").is_dir() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }
    start.to_path_buf()
}
