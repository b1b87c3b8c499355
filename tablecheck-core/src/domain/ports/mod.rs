// src/domain/ports/mod.rs

pub mod catalog;
pub mod schema;
pub mod table;

pub use catalog::{CatalogSource, NoCatalog};
pub use schema::SchemaSource;
pub use table::TableSource;
