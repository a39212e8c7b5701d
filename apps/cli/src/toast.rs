//! Confirmation messages printed after a change is saved.

use std::io::{Stdout, Write};
use std::sync::Mutex;
use tally_store::{Notifier, SaleEvent};
use tracing::warn;

/// Writes each event's title on its own line, the way the entry form's
/// toast would show it.
#[derive(Debug)]
pub struct ToastNotifier<W = Stdout> {
    out: Mutex<W>,
}

impl ToastNotifier<Stdout> {
    pub fn stdout() -> Self {
        ToastNotifier::new(std::io::stdout())
    }
}

impl<W: Write + Send> ToastNotifier<W> {
    pub fn new(out: W) -> Self {
        ToastNotifier {
            out: Mutex::new(out),
        }
    }

    /// Runs `f` with the writer, e.g. to read back what was written.
    pub fn with_output<R>(&self, f: impl FnOnce(&W) -> R) -> Option<R> {
        self.out.lock().ok().map(|out| f(&*out))
    }
}

impl<W: Write + Send> Notifier for ToastNotifier<W> {
    fn notify(&self, event: &SaleEvent) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };

        if let Err(err) = writeln!(out, "{}", event.title()) {
            warn!(error = %err, "Failed to print confirmation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SaleArgs;
    use crate::commands::sale;
    use crate::config::{AppConfig, Backend};
    use std::sync::Arc;
    use tally_store::{MemoryStorage, SalesStore};

    #[tokio::test]
    async fn test_toasts_follow_successful_changes() {
        let toasts = Arc::new(ToastNotifier::new(Vec::new()));
        let mut store = SalesStore::load(Arc::new(MemoryStorage::new()), "sales-storage")
            .await
            .unwrap()
            .with_notifier(toasts.clone());
        let config = AppConfig {
            data_dir: std::path::PathBuf::from("."),
            backend: Backend::Memory,
            storage_key: "sales-storage".to_string(),
            currency_prefix: "Rp".to_string(),
        };
        let args = SaleArgs {
            code: Some("TEST-001".to_string()),
            date: Some("2025-04-15".to_string()),
            items: vec!["Test Product:5:100".to_string()],
            discount: None,
        };
        let mut out = Vec::new();

        sale::add(&mut store, &config, &args, &mut out).await.unwrap();
        sale::edit(&mut store, &config, 0, &SaleArgs::default(), &mut out)
            .await
            .unwrap();
        assert!(sale::delete(&mut store, 5, &mut out).await.is_err());
        sale::delete(&mut store, 0, &mut out).await.unwrap();

        let text = toasts
            .with_output(|buf| String::from_utf8(buf.clone()).unwrap())
            .unwrap();
        assert_eq!(
            text,
            "Sale added successfully\nSale updated successfully\nSale deleted successfully\n"
        );
    }
}
