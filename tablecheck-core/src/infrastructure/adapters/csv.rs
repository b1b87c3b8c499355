// tablecheck-core/src/infrastructure/adapters/csv.rs

use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::checks::FileFingerprint;
use crate::domain::error::DomainError;
use crate::domain::ports::TableSource;
use crate::domain::schema::{DatasetVersion, TableSchema};
use crate::domain::table::LoadedTable;
use crate::infrastructure::fs::sha256_file;

const UTF8_BOM: char = '\u{feff}';

/// Reads `<datasets>/<dataset>/<version>/<table>.csv` files.
pub struct CsvTableSource {
    datasets_dir: PathBuf,
    null_markers: Vec<String>,
}

impl CsvTableSource {
    pub fn new(datasets_dir: impl Into<PathBuf>, null_markers: Vec<String>) -> Self {
        Self {
            datasets_dir: datasets_dir.into(),
            null_markers,
        }
    }

    fn version_dir(&self, dataset: &DatasetVersion) -> PathBuf {
        self.datasets_dir
            .join(&dataset.dataset_id)
            .join(&dataset.version)
    }

    fn table_path(&self, dataset: &DatasetVersion, schema: &TableSchema) -> PathBuf {
        self.version_dir(dataset).join(schema.file_name())
    }
}

impl TableSource for CsvTableSource {
    fn location(&self, dataset: &DatasetVersion) -> String {
        self.version_dir(dataset).display().to_string()
    }

    fn list_files(&self, dataset: &DatasetVersion) -> Result<Vec<String>, DomainError> {
        let dir = self.version_dir(dataset);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        files.sort();
        Ok(files)
    }

    #[instrument(skip_all, fields(table = %schema.name))]
    fn load_table(
        &self,
        dataset: &DatasetVersion,
        schema: &TableSchema,
    ) -> Result<LoadedTable, DomainError> {
        let path = self.table_path(dataset, schema);
        if !path.is_file() {
            return Err(DomainError::FileMissing(path.display().to_string()));
        }

        let parse_err = |e: csv::Error| DomainError::TableParse {
            table: schema.name.clone(),
            reason: e.to_string(),
        };

        // Ragged records are kept and reshaped by `LoadedTable::from_records`.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(parse_err)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_err)?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
                h.trim().to_string()
            })
            .collect();

        let records = reader
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect::<Vec<String>>()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(parse_err)?;

        let table = LoadedTable::from_records(schema, headers, records, &self.null_markers);
        debug!(rows = table.row_count(), path = ?path, "Table loaded");
        Ok(table)
    }

    fn fingerprint(
        &self,
        dataset: &DatasetVersion,
        schema: &TableSchema,
    ) -> Result<FileFingerprint, DomainError> {
        let path = self.table_path(dataset, schema);
        let io_err = |e: String| DomainError::TableParse {
            table: schema.name.clone(),
            reason: e,
        };
        let size_bytes = fs::metadata(&path).map_err(|e| io_err(e.to_string()))?.len();
        let sha256 = sha256_file(&path).map_err(|e| io_err(e.to_string()))?;
        Ok(FileFingerprint { size_bytes, sha256 })
    }
}
