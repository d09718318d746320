//! spcatalog CLI: estimate, then catalog a directory tree into SQLite.

use anyhow::Result;
use clap::Parser;
use spcatalog::engine::arg_parser::Cli;
use spcatalog::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
