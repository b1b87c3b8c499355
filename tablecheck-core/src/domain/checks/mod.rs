// tablecheck-core/src/domain/checks/mod.rs

pub mod columns;
pub mod integrity;
pub mod keys;

pub use columns::ColumnChecker;
pub use integrity::{CatalogEntry, FileFingerprint, IntegrityChecker};
pub use keys::{DEFAULT_ORPHAN_THRESHOLD, DEFAULT_SAMPLE_SIZE, KeyChecker, orphan_severity};
