// tablecheck-core/src/application/mod.rs

pub mod report;
pub mod validation;

// --- RE-EXPORTS (FACADE) ---
// Lets the CLI write `use tablecheck_core::application::{run_validation, render_markdown};`

pub use report::{ReportPaths, render_json, render_markdown, write_reports};
pub use validation::{RunState, ValidationOutcome, Validator, report_dir, run_validation};
