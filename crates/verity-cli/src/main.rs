//! verity CLI - run and inspect provider record verification.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
