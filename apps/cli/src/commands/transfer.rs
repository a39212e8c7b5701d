//! # Import / Export
//!
//! Moves sales in and out of the ledger as JSON documents.
//!
//! Import reads the current document layout as well as the browser-storage
//! envelope (`{"state":{"sales":[...]},"version":0}`). Every sale in the
//! file is validated before any is added, and the accepted sales are saved
//! in one write: a bad sale or a failed write leaves the ledger as it was.

use std::io::Write;
use std::path::Path;
use tally_core::{parse_draft_document, validate, FieldErrors, Sale};
use tally_store::{SalesStore, StoreError};
use tracing::info;

use crate::error::CliError;

/// Appends every sale found in the document at `path`.
///
/// Field paths in validation errors are prefixed with the sale's position in
/// the file, e.g. `sales.2.items.0.qty`.
pub async fn import(
    store: &mut SalesStore,
    path: &Path,
    out: &mut dyn Write,
) -> Result<usize, CliError> {
    let json = tokio::fs::read_to_string(path).await?;

    let drafts = parse_draft_document(&json).map_err(|e| {
        CliError::invalid_input(format!("Could not parse {}: {e}", path.display()))
    })?;

    let mut errors = FieldErrors::new();
    let mut sales: Vec<Sale> = Vec::with_capacity(drafts.len());

    for (i, draft) in drafts.iter().enumerate() {
        match validate(draft) {
            Ok(sale) => sales.push(sale),
            Err(sale_errors) => {
                for (field, err) in sale_errors.iter() {
                    errors.insert(format!("sales.{i}.{field}"), err.clone());
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let count = store.add_all(sales).await?.len();

    info!(path = %path.display(), count, "Imported sales");
    writeln!(out, "Imported {count} sale(s)")?;
    Ok(count)
}

/// Writes the ledger document to `path`, or to `out` when no path is given.
pub async fn export(
    store: &SalesStore,
    path: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let json = store
        .to_document()
        .to_json_pretty()
        .map_err(StoreError::from)?;

    match path {
        Some(path) => {
            tokio::fs::write(path, json.as_bytes()).await?;
            info!(path = %path.display(), count = store.len(), "Exported sales");
            writeln!(out, "Exported {} sale(s) to {}", store.len(), path.display())?;
        }
        None => writeln!(out, "{json}")?,
    }

    Ok(())
}
