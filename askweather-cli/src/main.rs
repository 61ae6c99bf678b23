//! Binary crate for the `askweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and setting up logging
//! - Interactive prompts and credential configuration
//! - Printing the model's answer

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cli::init_logging(cmd.verbose);
    cmd.run().await
}
