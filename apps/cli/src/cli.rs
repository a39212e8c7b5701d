//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Backend, Overrides};

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(about = "Record, review, and edit sales invoices", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the ledger (overrides TALLY_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: sqlite, file, or memory (overrides TALLY_BACKEND)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The configuration values given as flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            backend: self.backend,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every sale with its grand total
    List,

    /// Show one sale with its items and totals
    Show {
        /// Position of the sale in the list
        index: usize,
    },

    /// Record a new sale
    Add(SaleArgs),

    /// Change a recorded sale; omitted fields keep their current values
    Edit {
        /// Position of the sale in the list
        index: usize,

        #[command(flatten)]
        fields: SaleArgs,
    },

    /// Remove a sale; later sales move up by one
    Delete {
        /// Position of the sale in the list
        index: usize,
    },

    /// Append the sales found in a JSON document
    Import {
        /// Document to read
        path: PathBuf,
    },

    /// Write the ledger as a JSON document
    Export {
        /// Destination file (stdout when omitted)
        path: Option<PathBuf>,
    },
}

/// Sale fields as typed on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct SaleArgs {
    /// Invoice code
    #[arg(long)]
    pub code: Option<String>,

    /// Invoice date, YYYY-MM-DD or RFC 3339
    #[arg(long)]
    pub date: Option<String>,

    /// Line item as "name:qty:price"; repeat for more items
    #[arg(long = "item", value_name = "NAME:QTY:PRICE")]
    pub items: Vec<String>,

    /// Flat discount subtracted from the subtotal
    #[arg(long)]
    pub discount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "tally",
            "add",
            "--code",
            "TEST-001",
            "--date",
            "2025-04-15",
            "--item",
            "Test Product:5:100",
            "--item",
            "Second Product:2:200",
            "--discount",
            "50",
        ])
        .unwrap();

        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.code.as_deref(), Some("TEST-001"));
        assert_eq!(args.items.len(), 2);
        assert_eq!(args.discount.as_deref(), Some("50"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tally", "list", "--backend", "memory", "--data-dir", "/tmp/x"])
            .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.backend, Some(Backend::Memory));
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["tally", "--backend", "redis", "list"]).is_err());
    }

    #[test]
    fn test_edit_fields_optional() {
        let cli = Cli::try_parse_from(["tally", "edit", "3", "--discount", "10"]).unwrap();
        let Command::Edit { index, fields } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(index, 3);
        assert_eq!(fields.code, None);
        assert!(fields.items.is_empty());
    }
}
