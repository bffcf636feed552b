mod browser;
mod cli;
mod config;
mod error;
mod extract;
mod interaction;
mod pipeline;
mod reporting;
mod sinks;
mod types;

use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = cli::parse();

    // RUST_LOG wins over --verbose when set.
    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match pipeline::workflow::run(config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
