//! # Commands
//!
//! One function per subcommand. Each takes the loaded store and a writer for
//! its output, so tests can run them against an in-memory store and a
//! `Vec<u8>`.

pub mod sale;
pub mod transfer;

use std::io::Write;
use tally_store::SalesStore;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::CliError;

/// Runs `command` against `store`.
pub async fn execute(
    command: &Command,
    store: &mut SalesStore,
    config: &AppConfig,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::List => sale::list(store, config, out),
        Command::Show { index } => sale::show(store, config, *index, out),
        Command::Add(args) => sale::add(store, config, args, out).await.map(|_| ()),
        Command::Edit { index, fields } => sale::edit(store, config, *index, fields, out).await,
        Command::Delete { index } => sale::delete(store, *index, out).await,
        Command::Import { path } => transfer::import(store, path, out).await.map(|_| ()),
        Command::Export { path } => transfer::export(store, path.as_deref(), out).await,
    }
}
