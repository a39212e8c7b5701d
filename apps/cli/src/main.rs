//! # Tally Entry Point
//!
//! ```text
//! tally list
//! tally show <index>
//! tally add --code <code> --date <date> --item "<name>:<qty>:<price>"... [--discount <n>]
//! tally edit <index> [--code ..] [--date ..] [--item ..]... [--discount ..]
//! tally delete <index>
//! tally import <path>
//! tally export [<path>]
//! ```
//!
//! Exit status: 0 on success, 2 when a sale fails validation, 1 for any
//! other error.

use clap::Parser;
use std::process::ExitCode;
use tally_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The actual setup is in lib.rs for better testability
    tally_cli::init_tracing();

    match tally_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => err.report(),
    }
}
