// tablecheck-core/src/application/validation.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::application::report::{ReportPaths, write_reports};
use crate::domain::checks::{CatalogEntry, ColumnChecker, IntegrityChecker, KeyChecker};
use crate::domain::error::DomainError;
use crate::domain::ports::{CatalogSource, SchemaSource, TableSource};
use crate::domain::project::ProjectSettings;
use crate::domain::report::{CheckResult, ReportBuilder, Rule, ValidationReport};
use crate::domain::schema::{DatasetSchema, DatasetVersion, TableSchema};
use crate::domain::table::LoadedTable;
use crate::error::TablecheckError;
use crate::infrastructure::adapters::CsvTableSource;
use crate::infrastructure::config::{CatalogAdapter, SchemaAdapter};

/// Lifecycle of one run. `SchemaError` and `NoTablesFound` end it without a
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    SchemaLoaded,
    FilesDiscovered,
    TablesChecked,
    KeysChecked,
    ReportBuilt,
    Done,
    SchemaError,
    NoTablesFound,
}

/// Wires the three input ports to the checkers. Holds no state between runs.
pub struct Validator<'a> {
    schemas: &'a dyn SchemaSource,
    tables: &'a dyn TableSource,
    catalog: &'a dyn CatalogSource,
    keys: KeyChecker,
}

impl<'a> Validator<'a> {
    pub fn new(
        schemas: &'a dyn SchemaSource,
        tables: &'a dyn TableSource,
        catalog: &'a dyn CatalogSource,
        settings: &ProjectSettings,
    ) -> Self {
        Self {
            schemas,
            tables,
            catalog,
            keys: KeyChecker::new(settings.orphan_threshold, settings.sample_size),
        }
    }

    pub fn run(&self, dataset: &DatasetVersion) -> Result<ValidationReport, TablecheckError> {
        self.run_at(dataset, Utc::now().to_rfc3339())
    }

    /// Same as [`Validator::run`] with a fixed timestamp.
    #[instrument(skip_all, fields(dataset = %dataset))]
    pub fn run_at(
        &self,
        dataset: &DatasetVersion,
        run_timestamp: String,
    ) -> Result<ValidationReport, TablecheckError> {
        let mut state = RunState::Start;
        debug!(?state);

        let schema = match self.schemas.load_schema(dataset) {
            Ok(schema) => schema,
            Err(e) => {
                state = RunState::SchemaError;
                debug!(?state, error = %e);
                return Err(e.into());
            }
        };
        state = RunState::SchemaLoaded;
        debug!(?state, tables = schema.tables.len());

        let files = self.tables.list_files(dataset)?;
        let declared: HashSet<String> = schema.tables.iter().map(TableSchema::file_name).collect();
        if !files.iter().any(|f| declared.contains(f)) {
            state = RunState::NoTablesFound;
            debug!(?state);
            return Err(DomainError::NoTablesFound {
                dataset: dataset.to_string(),
                path: self.tables.location(dataset),
            }
            .into());
        }
        state = RunState::FilesDiscovered;
        debug!(?state, files = files.len());

        let mut builder = ReportBuilder::new();
        let catalog = self.catalog_entries(dataset);
        let mut loaded: HashMap<String, LoadedTable> = HashMap::new();

        for table in &schema.tables {
            if let Some(loaded_table) = self.check_table(dataset, table, &catalog, &mut builder)? {
                loaded.insert(table.name.clone(), loaded_table);
            }
        }

        for file in files.iter().filter(|f| !declared.contains(*f)) {
            let table = file.strip_suffix(".csv").unwrap_or(file);
            builder.push(CheckResult::warn(
                Rule::UnexpectedFile,
                table,
                format!("Data file not declared in schema: {}", file),
            ));
        }
        state = RunState::TablesChecked;
        debug!(?state, loaded = loaded.len());

        self.check_keys(&schema, &loaded, &mut builder);
        state = RunState::KeysChecked;
        debug!(?state);

        let report = builder.finish(&dataset.dataset_id, &dataset.version, run_timestamp);
        state = RunState::ReportBuilt;
        debug!(?state);

        info!(
            pass = report.summary.pass,
            warn = report.summary.warn,
            fail = report.summary.fail,
            "Validation finished"
        );
        state = RunState::Done;
        debug!(?state);
        Ok(report)
    }

    fn catalog_entries(&self, dataset: &DatasetVersion) -> HashMap<String, CatalogEntry> {
        match self.catalog.entries(dataset) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Catalog unreadable, integrity checks skipped");
                HashMap::new()
            }
        }
    }

    /// Loads one table and runs the per-table checks. A missing or unreadable
    /// file is reported, not propagated.
    fn check_table(
        &self,
        dataset: &DatasetVersion,
        table: &TableSchema,
        catalog: &HashMap<String, CatalogEntry>,
        builder: &mut ReportBuilder,
    ) -> Result<Option<LoadedTable>, TablecheckError> {
        let file_name = table.file_name();
        let loaded = match self.tables.load_table(dataset, table) {
            Ok(loaded) => loaded,
            Err(DomainError::FileMissing(path)) => {
                warn!(table = %table.name, path = %path, "Data file missing");
                builder.push(CheckResult::fail(
                    Rule::FileExists,
                    &table.name,
                    format!("Missing data file: {}", file_name),
                ));
                return Ok(None);
            }
            Err(DomainError::TableParse { reason, .. }) => {
                warn!(table = %table.name, reason = %reason, "Data file unreadable");
                builder.push(CheckResult::fail(
                    Rule::FileExists,
                    &table.name,
                    format!("Unreadable data file {}: {}", file_name, reason),
                ));
                return Ok(None);
            }
            Err(other) => return Err(other.into()),
        };

        builder.push(CheckResult::pass(
            Rule::FileExists,
            &table.name,
            format!("Found {} ({} row(s))", file_name, loaded.row_count()),
        ));

        if let Some(entry) = catalog.get(&file_name) {
            match self.tables.fingerprint(dataset, table) {
                Ok(actual) => builder.extend(IntegrityChecker::check(&table.name, entry, &actual)),
                Err(e) => warn!(table = %table.name, error = %e, "Could not fingerprint data file"),
            }
        }

        builder.extend(ColumnChecker::check(table, &loaded));
        Ok(Some(loaded))
    }

    fn check_keys(
        &self,
        schema: &DatasetSchema,
        loaded: &HashMap<String, LoadedTable>,
        builder: &mut ReportBuilder,
    ) {
        for table in &schema.tables {
            let Some(loaded_table) = loaded.get(&table.name) else {
                continue;
            };
            if let Some(result) = self.keys.check_primary_key(table, loaded_table) {
                builder.push(result);
            }
            builder.extend(self.keys.check_foreign_keys(table, loaded_table, loaded));
        }
    }
}

/// Report of one run plus where it was written, if it was.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub written: Option<ReportPaths>,
}

/// Builds the file-backed adapters for `repo_root`, runs the validation and
/// writes both reports under `<artifacts>/<id>/<version>/` unless `write` is false.
#[instrument(skip(repo_root, settings))]
pub fn run_validation(
    repo_root: &Path,
    settings: &ProjectSettings,
    dataset_id: &str,
    version: &str,
    write: bool,
) -> Result<ValidationOutcome, TablecheckError> {
    let dataset = DatasetVersion::new(dataset_id, version)?;

    let schemas = SchemaAdapter::new(repo_root.join(&settings.schemas_path));
    let tables = CsvTableSource::new(
        repo_root.join(&settings.datasets_path),
        settings.null_markers.clone(),
    );
    let catalog = CatalogAdapter::new(repo_root.join(&settings.catalog_path), &settings.datasets_path);

    let report = Validator::new(&schemas, &tables, &catalog, settings).run(&dataset)?;

    let written = if write {
        let out_dir = report_dir(repo_root, settings, &dataset);
        Some(write_reports(&report, &out_dir)?)
    } else {
        None
    };

    Ok(ValidationOutcome { report, written })
}

pub fn report_dir(repo_root: &Path, settings: &ProjectSettings, dataset: &DatasetVersion) -> PathBuf {
    repo_root
        .join(&settings.artifacts_path)
        .join(&dataset.dataset_id)
        .join(&dataset.version)
}
