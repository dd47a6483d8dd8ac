//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Loading `.env` files and setting up logging
//! - Human-friendly output formatting and exit codes

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod exitcode;
mod logging;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose)?;
    cmd.load_env_file()?;
    Ok(cmd.run().await)
}
