//! Binary crate for the `solar` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive form and configuration prompts
//! - Human-friendly output formatting

use clap::Parser;
use tracing::Level;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    cmd.run().await
}
