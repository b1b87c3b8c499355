// tablecheck/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tablecheck")]
#[command(about = "Schema conformance validator for versioned CSV datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug-level logs on stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ✅ Validates one dataset version and writes its reports
    Validate {
        /// Repository root (default: discovered from the current directory)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Dataset identifier (ex: "covenant_pl")
        #[arg(long, short)]
        dataset: String,

        /// Dataset version (ex: "v1.0.0")
        #[arg(long, short = 'V')]
        version: String,

        /// Print the summary only, without writing report files
        #[arg(long)]
        no_write: bool,
    },

    /// 📋 Loads and checks a schema declaration without reading any data
    Schema {
        #[arg(long)]
        repo: Option<PathBuf>,

        #[arg(long, short)]
        dataset: String,

        #[arg(long, short = 'V')]
        version: String,
    },
}
