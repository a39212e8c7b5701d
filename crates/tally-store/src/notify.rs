//! # Notifications
//!
//! Fire-and-forget messages sent after a change to the collection has been
//! applied and persisted. The store never waits on, or looks at, what a
//! notifier does.

use tracing::info;

/// A completed change to the sales collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleEvent {
    Added { index: usize, invoice_code: String },
    Updated { index: usize, invoice_code: String },
    Deleted { index: usize, invoice_code: String },
}

impl SaleEvent {
    /// The short confirmation shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            SaleEvent::Added { .. } => "Sale added successfully",
            SaleEvent::Updated { .. } => "Sale updated successfully",
            SaleEvent::Deleted { .. } => "Sale deleted successfully",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SaleEvent::Added { index, .. }
            | SaleEvent::Updated { index, .. }
            | SaleEvent::Deleted { index, .. } => *index,
        }
    }

    pub fn invoice_code(&self) -> &str {
        match self {
            SaleEvent::Added { invoice_code, .. }
            | SaleEvent::Updated { invoice_code, .. }
            | SaleEvent::Deleted { invoice_code, .. } => invoice_code,
        }
    }
}

/// Receives [`SaleEvent`]s.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &SaleEvent);
}

/// Default notifier: logs each event at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &SaleEvent) {
        info!(
            index = event.index(),
            invoice_code = %event.invoice_code(),
            "{}",
            event.title()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        let event = SaleEvent::Updated {
            index: 2,
            invoice_code: "INV-2".to_string(),
        };
        assert_eq!(event.title(), "Sale updated successfully");
        assert_eq!(event.index(), 2);
        assert_eq!(event.invoice_code(), "INV-2");
    }
}
