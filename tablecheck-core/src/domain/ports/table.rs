use crate::domain::checks::FileFingerprint;
use crate::domain::error::DomainError;
use crate::domain::schema::{DatasetVersion, TableSchema};
use crate::domain::table::LoadedTable;

pub trait TableSource: Send + Sync {
    /// Human-readable location of the version's data files.
    fn location(&self, dataset: &DatasetVersion) -> String;

    /// File names of every table file present for the version. An absent
    /// directory yields an empty list.
    fn list_files(&self, dataset: &DatasetVersion) -> Result<Vec<String>, DomainError>;

    /// Reads `<table>.csv`. `FileMissing` when absent, `TableParse` when unreadable.
    fn load_table(
        &self,
        dataset: &DatasetVersion,
        schema: &TableSchema,
    ) -> Result<LoadedTable, DomainError>;

    fn fingerprint(
        &self,
        dataset: &DatasetVersion,
        schema: &TableSchema,
    ) -> Result<FileFingerprint, DomainError>;
}
