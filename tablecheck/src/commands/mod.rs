// tablecheck/src/commands/mod.rs

pub mod schema;
pub mod validate;

use std::path::PathBuf;
use tracing::debug;

use tablecheck_core::TablecheckError;
use tablecheck_core::infrastructure::config::find_repo_root;

/// `--repo` when given, otherwise the nearest ancestor holding `schemas/` and `datasets/`.
fn resolve_repo(repo: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let root = match repo {
        Some(dir) => dir,
        None => find_repo_root(&std::env::current_dir()?),
    };
    debug!(repo = ?root, "Repository root resolved");
    Ok(root)
}

/// Renders the error with its diagnostic code and help, then exits 1.
fn abort(err: TablecheckError) -> ! {
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(1);
}
