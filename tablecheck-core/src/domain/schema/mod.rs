// tablecheck-core/src/domain/schema/mod.rs

pub mod column;
pub mod dataset;
pub mod table;

pub use column::{ColumnSpec, ColumnType, NumericRange};
pub use dataset::{DatasetSchema, DatasetVersion};
pub use table::{ForeignKeyRef, TableSchema};
