// tablecheck-core/src/domain/table.rs
//
// In-memory rows of one CSV file, coerced to the declared column types.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::domain::schema::{ColumnType, TableSchema};

pub const DEFAULT_NULL_MARKERS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// A cell that failed coercion. Kept raw for diagnostics; the nullability,
    /// range and key checks treat it like a null.
    Invalid(String),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Best-effort coercion of one raw cell to `column_type`.
    pub fn coerce(raw: &str, column_type: ColumnType, null_markers: &[String]) -> Value {
        let trimmed = raw.trim();
        if null_markers.iter().any(|m| m == trimmed) {
            return Value::Null;
        }

        let parsed = match column_type {
            ColumnType::String => Some(Value::Str(raw.to_string())),
            ColumnType::Int => parse_int(trimmed).map(Value::Int),
            ColumnType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            ColumnType::Bool => parse_bool(trimmed).map(Value::Bool),
            ColumnType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(Value::Date),
            ColumnType::DateTime => parse_datetime(trimmed).map(Value::DateTime),
        };

        parsed.unwrap_or_else(|| Value::Invalid(raw.to_string()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid(_))
    }

    /// Null or invalid: a null for not-null checks, skipped by range and key checks.
    pub fn is_missing(&self) -> bool {
        self.is_null() || self.is_invalid()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Canonical text used to compare key values across tables.
    pub fn key_repr(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        Some(self.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Invalid(raw) | Value::Str(raw) => write!(f, "{}", raw),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    // "3.0" is a whole number written by float-typed exporters
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Some(f as i64);
    }
    None
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Rows of one CSV file. Declared columns hold coerced values; columns absent
/// from the schema keep their raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Records whose field count differed from the header. Every row is
    /// header-width: short records are padded with nulls, extra fields dropped.
    pub ragged_rows: usize,
}

impl LoadedTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
            ragged_rows: 0,
        }
    }

    /// Coerces raw records against `schema` and appends them.
    pub fn from_records<I, R>(
        schema: &TableSchema,
        headers: Vec<String>,
        records: I,
        null_markers: &[String],
    ) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        let types: Vec<Option<ColumnType>> = headers
            .iter()
            .map(|h| schema.column(h).map(|c| c.column_type))
            .collect();

        let width = headers.len();
        let mut table = Self::new(&schema.name, headers);
        for record in records {
            let fields = record.as_ref();
            if fields.len() != width {
                table.ragged_rows += 1;
            }
            let mut row: Vec<Value> = fields
                .iter()
                .zip(&types)
                .map(|(raw, ty)| match ty {
                    Some(ty) => Value::coerce(raw, *ty, null_markers),
                    None => Value::Str(raw.clone()),
                })
                .collect();
            row.resize(width, Value::Null);
            table.rows.push(row);
        }
        table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |row| row.get(idx)))
    }
}
