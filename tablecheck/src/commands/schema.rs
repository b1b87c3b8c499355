// tablecheck/src/commands/schema.rs
//
// USE CASE: Load a schema declaration and print what it declares.

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};
use tablecheck_core::domain::ports::SchemaSource;
use tablecheck_core::domain::schema::{DatasetVersion, TableSchema};
use tablecheck_core::infrastructure::config::{SchemaAdapter, load_project_settings};

use super::{abort, resolve_repo};

pub fn execute(repo: Option<PathBuf>, dataset: String, version: String) -> anyhow::Result<()> {
    let repo_root = resolve_repo(repo)?;
    let settings = match load_project_settings(&repo_root) {
        Ok(settings) => settings,
        Err(e) => abort(e.into()),
    };

    let dataset = match DatasetVersion::new(dataset, version) {
        Ok(dataset) => dataset,
        Err(e) => abort(e.into()),
    };
    let adapter = SchemaAdapter::new(repo_root.join(&settings.schemas_path));
    let schema = match adapter.load_schema(&dataset) {
        Ok(schema) => schema,
        Err(e) => abort(e.into()),
    };

    println!(
        "📋 {} ({} table(s))",
        schema.dataset,
        schema.tables.len()
    );
    for table in &schema.tables {
        print_table(table);
    }
    Ok(())
}

fn print_table(schema: &TableSchema) {
    println!("\n{} ({})", schema.name, schema.file_name());
    if let Some(description) = &schema.description {
        println!("   {}", description);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Column", "Type", "Nullable", "Required", "Range"]);
    for col in &schema.columns {
        table.add_row(vec![
            col.name.clone(),
            col.column_type.to_string(),
            col.nullable.to_string(),
            col.required.to_string(),
            col.range.map(|r| r.to_string()).unwrap_or_default(),
        ]);
    }
    println!("{table}");

    if !schema.primary_key.is_empty() {
        println!("   Primary key: ({})", schema.primary_key.join(", "));
    }
    for fk in &schema.foreign_keys {
        println!("   Foreign key: {}", fk);
    }
}
