// tablecheck/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG=tablecheck_core=debug tablecheck validate ... for the details
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            repo,
            dataset,
            version,
            no_write,
        } => commands::validate::execute(repo, dataset, version, no_write),
        Commands::Schema {
            repo,
            dataset,
            version,
        } => commands::schema::execute(repo, dataset, version),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the summary, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
