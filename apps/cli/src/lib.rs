//! # Tally CLI Library
//!
//! Command-line front end for the Tally sales ledger.
//!
//! ## Module Organization
//! ```text
//! tally_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── Flags / env / tally.toml / defaults
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command dispatch
//! │   ├── sale.rs     ◄─── list, show, add, edit, delete
//! │   └── transfer.rs ◄─── import, export
//! ├── toast.rs        ◄─── Confirmation messages
//! └── error.rs        ◄─── CLI error type and exit codes
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod toast;

use std::sync::Arc;
use tally_store::SalesStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;
use error::CliError;
use toast::ToastNotifier;

/// Runs one command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                          Command Startup                                │
/// │                                                                         │
/// │  1. Resolve Configuration ────────────────────────────────────────────► │
/// │     • --data-dir / --backend, then TALLY_*, then tally.toml             │
/// │                                                                         │
/// │  2. Open Storage ─────────────────────────────────────────────────────► │
/// │     • sqlite: connect, WAL mode, run pending migrations                 │
/// │     • file / memory: nothing to open                                    │
/// │                                                                         │
/// │  3. Load SalesStore ──────────────────────────────────────────────────► │
/// │     • Missing document: empty ledger                                    │
/// │     • Corrupt document: stop with STORAGE_ERROR                         │
/// │                                                                         │
/// │  4. Execute Command ──────────────────────────────────────────────────► │
/// │     • Output to stdout, logs and errors to stderr                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::resolve(&cli.overrides())?;
    debug!(?config, "Configuration resolved");

    let storage = config.open_storage().await?;
    let mut store = SalesStore::load(storage, config.storage_key.clone())
        .await?
        .with_notifier(Arc::new(ToastNotifier::stdout()));

    let mut out = std::io::stdout();
    commands::execute(&cli.command, &mut store, &config, &mut out).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout can be piped.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_store=trace` - Show trace for the store only
/// - Default: WARN
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
