//! backfeed CLI — decode JSON feed backups into normalized documents.
//!
//! Thin outer caller around the core pipeline: supplies a feed location,
//! consumes a `Document` or an error.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
