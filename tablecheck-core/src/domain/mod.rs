pub mod checks;
pub mod error;
pub mod ports;
pub mod project;
pub mod report;
pub mod schema;
pub mod table;

// Re-exports to keep imports short elsewhere
pub use error::DomainError;
