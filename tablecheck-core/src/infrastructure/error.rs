// tablecheck-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(tablecheck::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(tablecheck::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(tablecheck::infra::config))]
    ConfigError(String),

    #[error("Invalid settings in {path}: {source}")]
    #[diagnostic(
        code(tablecheck::infra::settings),
        help("orphan-threshold must be within [0, 1] and sample-size at least 1.")
    )]
    InvalidSettings {
        path: String,
        source: validator::ValidationErrors,
    },

    // --- REPORT OUTPUT ---
    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(tablecheck::infra::json))]
    Json(#[from] serde_json::Error),
}
