//! # Sale Commands
//!
//! List, detail, entry, edit, and delete views over the [`SalesStore`].
//!
//! ## Entry and Edit
//! ```text
//! add:   SaleDraft::default() ──┐
//!                               ├─► apply SaleArgs ─► validate ─► store.add
//! edit:  store.get(i).to_draft()┘                         │         store.update
//!                                                         ▼
//!                                              FieldErrors → exit 2,
//!                                              store untouched
//! ```

use std::io::Write;
use tally_core::{mask_number, parse_invoice_date, validate, ItemDraft, Sale, SaleDraft};
use tally_store::SalesStore;
use tracing::debug;

use crate::cli::SaleArgs;
use crate::config::AppConfig;
use crate::error::CliError;

// =============================================================================
// Input Parsing
// =============================================================================

/// Parses a `name:qty:price` item.
///
/// The name may itself contain colons; qty and price are read through
/// [`mask_number`], so `"Rp 1.000"` is 1000.
pub fn parse_item(input: &str) -> Result<ItemDraft, CliError> {
    let mut parts = input.rsplitn(3, ':');
    let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CliError::invalid_input(format!(
            "Invalid item '{input}': expected NAME:QTY:PRICE"
        )));
    };

    Ok(ItemDraft::new(name, mask_number(qty), mask_number(price)))
}

/// Parses a `--date` value.
pub fn parse_date(text: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    parse_invoice_date(text).ok_or_else(|| {
        CliError::invalid_input(format!(
            "Invalid date '{text}': expected YYYY-MM-DD or an RFC 3339 timestamp"
        ))
    })
}

impl SaleArgs {
    /// Overwrites the fields of `draft` that were given.
    ///
    /// Items, when given, replace the whole item list.
    pub fn apply_to(&self, draft: &mut SaleDraft) -> Result<(), CliError> {
        if let Some(code) = &self.code {
            draft.invoice_code = code.clone();
        }

        if let Some(date) = &self.date {
            draft.invoice_date = Some(parse_date(date)?);
        }

        if !self.items.is_empty() {
            draft.items = self
                .items
                .iter()
                .map(|item| parse_item(item))
                .collect::<Result<_, _>>()?;
        }

        if let Some(discount) = &self.discount {
            draft.discount = mask_number(discount);
        }

        Ok(())
    }
}

// =============================================================================
// Views
// =============================================================================

/// Prints every sale, one row each.
pub fn list(store: &SalesStore, config: &AppConfig, out: &mut dyn Write) -> Result<(), CliError> {
    if store.is_empty() {
        writeln!(out, "No sales recorded")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3}  {:<32}  {:<10}  {:>5}  {:>16}",
        "#", "Invoice", "Date", "Items", "Grand Total"
    )?;

    for (index, sale) in store.sales().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<32}  {:<10}  {:>5}  {:>16}",
            index,
            sale.invoice_code,
            format_date(sale),
            sale.items.len(),
            config.format_money(sale.grand_total())
        )?;
    }

    Ok(())
}

/// Prints one sale with its items and totals.
pub fn show(
    store: &SalesStore,
    config: &AppConfig,
    index: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let sale = store.get(index).ok_or_else(|| CliError::not_found(index))?;
    let totals = sale.totals();

    writeln!(out, "Invoice:  {}", sale.invoice_code)?;
    writeln!(out, "Date:     {}", format_date(sale))?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>3}  {:<32}  {:>5}  {:>16}  {:>16}",
        "#", "Product", "Qty", "Price", "Amount"
    )?;

    for (i, item) in sale.items.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<32}  {:>5}  {:>16}  {:>16}",
            i + 1,
            item.product_name,
            item.qty,
            config.format_money(item.price),
            config.format_money(item.line_total())
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Subtotal:     {}", config.format_money(totals.subtotal))?;
    writeln!(out, "Discount:     {}", config.format_money(totals.discount))?;
    writeln!(out, "Grand Total:  {}", config.format_money(totals.grand_total))?;

    Ok(())
}

fn format_date(sale: &Sale) -> String {
    sale.invoice_date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Mutations
// =============================================================================

/// Validates the given fields as a new sale and appends it.
pub async fn add(
    store: &mut SalesStore,
    config: &AppConfig,
    args: &SaleArgs,
    out: &mut dyn Write,
) -> Result<usize, CliError> {
    let mut draft = SaleDraft::default();
    args.apply_to(&mut draft)?;

    let sale = validate(&draft)?;
    let total = sale.grand_total();
    let code = sale.invoice_code.clone();

    let index = store.add(sale).await?;
    debug!(index, "add command");

    writeln!(out, "#{index} {code}  {}", config.format_money(total))?;
    Ok(index)
}

/// Applies the given fields over the stored sale and replaces it.
pub async fn edit(
    store: &mut SalesStore,
    config: &AppConfig,
    index: usize,
    args: &SaleArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut draft = store
        .get(index)
        .map(Sale::to_draft)
        .ok_or_else(|| CliError::not_found(index))?;
    args.apply_to(&mut draft)?;

    let sale = validate(&draft)?;
    let total = sale.grand_total();
    let code = sale.invoice_code.clone();

    store
        .update(index, sale)
        .await?
        .ok_or_else(|| CliError::not_found(index))?;
    debug!(index, "edit command");

    writeln!(out, "#{index} {code}  {}", config.format_money(total))?;
    Ok(())
}

/// Removes the sale at `index`.
pub async fn delete(
    store: &mut SalesStore,
    index: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let removed = store
        .delete(index)
        .await?
        .ok_or_else(|| CliError::not_found(index))?;
    debug!(index, "delete command");

    writeln!(out, "Removed #{index} {}", removed.invoice_code)?;
    Ok(())
}
