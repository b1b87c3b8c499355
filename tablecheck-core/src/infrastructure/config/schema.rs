// src/infrastructure/config/schema.rs

use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::ports::SchemaSource;
use crate::domain::schema::{
    ColumnSpec, ColumnType, DatasetSchema, DatasetVersion, ForeignKeyRef, NumericRange,
    TableSchema,
};
use crate::infrastructure::config::project::load_yaml;

const SCHEMA_FILE_NAMES: [&str; 2] = ["schema.yaml", "schema.yml"];

/// Reads `<schemas>/<dataset>/<version>/schema.yaml`.
pub struct SchemaAdapter {
    schemas_dir: PathBuf,
}

impl SchemaAdapter {
    pub fn new(schemas_dir: impl Into<PathBuf>) -> Self {
        Self {
            schemas_dir: schemas_dir.into(),
        }
    }

    fn version_dir(&self, dataset: &DatasetVersion) -> PathBuf {
        self.schemas_dir
            .join(&dataset.dataset_id)
            .join(&dataset.version)
    }
}

impl SchemaSource for SchemaAdapter {
    #[instrument(skip_all, fields(dataset = %dataset))]
    fn load_schema(&self, dataset: &DatasetVersion) -> Result<DatasetSchema, DomainError> {
        let dir = self.version_dir(dataset);
        let path = SCHEMA_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| DomainError::SchemaNotFound {
                path: dir.join(SCHEMA_FILE_NAMES[0]).display().to_string(),
            })?;

        info!(path = ?path, "Loading schema");
        let file: SchemaFile = load_yaml(&path)
            .map_err(|e| DomainError::schema(path.display().to_string(), e.to_string()))?;
        file.into_domain(&path, dataset.clone())
    }
}

// =============================================================================
//  SCHEMA FILE CONTRACT
// =============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct SchemaFile {
    #[serde(default)]
    pub dataset: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    // Keyed by table name; "<name>.csv" keys are accepted as well.
    #[serde(alias = "files", default)]
    pub tables: Mapping,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TableDecl {
    #[serde(default)]
    description: Option<String>,

    #[serde(default, alias = "composite_key")]
    primary_key: Option<KeyDecl>,

    // Ordered mapping of name -> column, or a list of columns with a `name` field.
    #[serde(default)]
    columns: YamlValue,

    #[serde(default, alias = "join_keys")]
    foreign_keys: Vec<ForeignKeyDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyDecl {
    Single(String),
    Composite(Vec<String>),
}

impl KeyDecl {
    fn into_columns(self) -> Vec<String> {
        match self {
            KeyDecl::Single(col) => vec![col],
            KeyDecl::Composite(cols) => cols,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ColumnDecl {
    #[serde(alias = "type", default = "default_dtype")]
    dtype: String,
    #[serde(default)]
    nullable: Option<bool>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    description: Option<String>,
}

fn default_dtype() -> String {
    "string".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ForeignKeyDecl {
    column: String,
    references: String,
}

// =============================================================================
//  CONVERSION TO THE DOMAIN MODEL
// =============================================================================

impl SchemaFile {
    pub fn into_domain(self, path: &Path, dataset: DatasetVersion) -> Result<DatasetSchema, DomainError> {
        if let Some(declared) = &self.dataset
            && declared != &dataset.dataset_id
        {
            warn!(declared = %declared, requested = %dataset.dataset_id, "Schema declares another dataset id");
        }
        if let Some(declared) = &self.version
            && declared != &dataset.version
        {
            warn!(declared = %declared, requested = %dataset.version, "Schema declares another version");
        }

        let mut tables = Vec::with_capacity(self.tables.len());
        for (key, value) in self.tables {
            let raw_name = key.as_str().ok_or_else(|| {
                DomainError::schema(path.display().to_string(), "table names must be strings")
            })?;
            let name = raw_name.strip_suffix(".csv").unwrap_or(raw_name).to_string();
            let decl: TableDecl = if value.is_null() {
                TableDecl::default()
            } else {
                serde_yaml::from_value(value).map_err(|e| DomainError::schema(&name, e.to_string()))?
            };
            tables.push(decl.into_domain(name)?);
        }

        DatasetSchema::new(dataset, tables)
    }
}

impl TableDecl {
    fn into_domain(self, name: String) -> Result<TableSchema, DomainError> {
        let columns = parse_columns(&name, self.columns)?;

        let foreign_keys = self
            .foreign_keys
            .into_iter()
            .map(|fk| {
                ForeignKeyRef::parse(&fk.column, &fk.references).ok_or_else(|| {
                    DomainError::schema(
                        &name,
                        format!(
                            "foreign key on '{}' must reference 'table.column', got '{}'",
                            fk.column, fk.references
                        ),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TableSchema {
            name,
            description: self.description,
            columns,
            primary_key: self.primary_key.map(KeyDecl::into_columns).unwrap_or_default(),
            foreign_keys,
        })
    }
}

fn parse_columns(table: &str, value: YamlValue) -> Result<Vec<ColumnSpec>, DomainError> {
    match value {
        YamlValue::Null => Ok(Vec::new()),
        YamlValue::Mapping(map) => map
            .into_iter()
            .map(|(key, decl)| {
                let name = key
                    .as_str()
                    .ok_or_else(|| DomainError::schema(table, "column names must be strings"))?
                    .to_string();
                column_from_yaml(table, name, decl)
            })
            .collect(),
        YamlValue::Sequence(items) => items
            .into_iter()
            .map(|item| {
                let YamlValue::Mapping(mut map) = item else {
                    return Err(DomainError::schema(table, "column entries must be mappings"));
                };
                let name = map
                    .remove("name")
                    .and_then(|v| v.as_str().map(str::to_string))
                    .ok_or_else(|| DomainError::schema(table, "column entry without a name"))?;
                column_from_yaml(table, name, YamlValue::Mapping(map))
            })
            .collect(),
        _ => Err(DomainError::schema(
            table,
            "columns must be a mapping or a list",
        )),
    }
}

fn column_from_yaml(table: &str, name: String, value: YamlValue) -> Result<ColumnSpec, DomainError> {
    let decl: ColumnDecl = if value.is_null() {
        ColumnDecl {
            dtype: default_dtype(),
            ..Default::default()
        }
    } else {
        serde_yaml::from_value(value)
            .map_err(|e| DomainError::schema(table, format!("column '{}': {}", name, e)))?
    };

    let column_type = ColumnType::from_str(&decl.dtype)
        .map_err(|e| DomainError::schema(table, format!("column '{}': {}", name, e)))?;
    let nullable = decl.nullable.unwrap_or(false);
    let required = decl.required.unwrap_or(!nullable);
    let range = (decl.min.is_some() || decl.max.is_some()).then_some(NumericRange {
        min: decl.min,
        max: decl.max,
    });

    Ok(ColumnSpec {
        name,
        column_type,
        nullable,
        required,
        range,
        description: decl.description,
    })
}
