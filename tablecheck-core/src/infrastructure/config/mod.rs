pub mod catalog;
pub mod project;
pub mod schema;

pub use crate::domain::project::ProjectSettings;
pub use catalog::CatalogAdapter;
pub use project::{find_repo_root, load_project_settings};
pub use schema::{SchemaAdapter, SchemaFile};
