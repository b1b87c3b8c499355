// tablecheck-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Domain: schema model, loaded tables, checks and the report.
// Depends on nothing else in the crate.
pub mod domain;

// 2. Infrastructure (Adapters)
// YAML schema/catalog/settings files, CSV loader, atomic writes.
pub mod infrastructure;

// 3. Application (Use Cases)
// Orchestration of a validation run and report rendering.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::TablecheckError;
