//! # Sales Store
//!
//! The ordered sales collection and its persistence.
//!
//! ## Positional Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  index:    0          1          2          3                           │
//! │          [INV-1]    [INV-2]    [INV-3]    [INV-4]                       │
//! │                                                                         │
//! │  delete(1)                                                              │
//! │                                                                         │
//! │  index:    0          1          2                                      │
//! │          [INV-1]    [INV-3]    [INV-4]                                  │
//! │                                                                         │
//! │  A sale is addressed by where it sits. Deleting shifts every later      │
//! │  sale down by one, so an index held across a delete is stale.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Lifecycle
//! ```text
//! add / update / delete
//!      │
//!      ├── index out of range? → Ok(None), nothing written, no event
//!      │
//!      ▼
//! mutate Vec<Sale>
//!      │
//!      ▼
//! write whole document ──── fails? → Err(StoreError), change kept in memory
//!      │
//!      ▼
//! notifier.notify(event) → Ok(..)
//! ```

use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use tally_core::{Sale, SalesDocument};

use crate::error::{StoreError, StoreResult};
use crate::notify::{Notifier, SaleEvent, TracingNotifier};
use crate::storage::DocumentStorage;

/// The single source of truth for the sales collection.
///
/// Constructed once at startup with [`SalesStore::load`] and passed by
/// reference to whatever needs it.
pub struct SalesStore {
    sales: Vec<Sale>,
    storage: Arc<dyn DocumentStorage>,
    key: String,
    notifier: Arc<dyn Notifier>,
}

impl SalesStore {
    /// Reads the collection from `storage` under `key`.
    ///
    /// A key that was never written yields an empty collection. A document
    /// that exists but doesn't parse is an error.
    pub async fn load(storage: Arc<dyn DocumentStorage>, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();

        let sales = match storage.read(&key).await? {
            Some(json) => {
                SalesDocument::from_json(&json)
                    .map_err(|e| StoreError::corrupt(&key, e))?
                    .sales
            }
            None => Vec::new(),
        };

        info!(
            backend = storage.name(),
            key = %key,
            count = sales.len(),
            "Sales loaded"
        );

        Ok(SalesStore {
            sales,
            storage,
            key,
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Replaces the notifier told about successful changes.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the sale at `index`, or `None` if there is none.
    pub fn get(&self, index: usize) -> Option<&Sale> {
        self.sales.get(index)
    }

    /// Returns every sale, in order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// The key the collection is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the collection as the document that gets persisted.
    pub fn to_document(&self) -> SalesDocument {
        SalesDocument::new(self.sales.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends `sale` and returns its index.
    ///
    /// No duplicate check: two sales may share an invoice code.
    pub async fn add(&mut self, sale: Sale) -> StoreResult<usize> {
        let index = self.sales.len();
        let invoice_code = sale.invoice_code.clone();

        debug!(index, invoice_code = %invoice_code, "Adding sale");
        self.sales.push(sale);

        self.persist().await?;
        self.notifier.notify(&SaleEvent::Added { index, invoice_code });

        Ok(index)
    }

    /// Appends every sale in `sales` with a single write, returning the
    /// indices they were given.
    ///
    /// Storage holds either all of them or none. An empty list writes
    /// nothing.
    pub async fn add_all(&mut self, sales: Vec<Sale>) -> StoreResult<Range<usize>> {
        let start = self.sales.len();
        if sales.is_empty() {
            return Ok(start..start);
        }

        debug!(start, count = sales.len(), "Adding sales");
        self.sales.extend(sales);
        let added = start..self.sales.len();

        self.persist().await?;
        for index in added.clone() {
            let invoice_code = self.sales[index].invoice_code.clone();
            self.notifier.notify(&SaleEvent::Added { index, invoice_code });
        }

        Ok(added)
    }

    /// Replaces the sale at `index` with `sale`, returning the old one.
    ///
    /// Out of range: nothing changes, nothing is written, returns `Ok(None)`.
    pub async fn update(&mut self, index: usize, sale: Sale) -> StoreResult<Option<Sale>> {
        let len = self.sales.len();
        let Some(slot) = self.sales.get_mut(index) else {
            warn!(index, len, "Update ignored: no sale at index");
            return Ok(None);
        };

        let invoice_code = sale.invoice_code.clone();
        debug!(index, invoice_code = %invoice_code, "Updating sale");
        let previous = std::mem::replace(slot, sale);

        self.persist().await?;
        self.notifier.notify(&SaleEvent::Updated { index, invoice_code });

        Ok(Some(previous))
    }

    /// Removes the sale at `index`, shifting later sales down by one.
    ///
    /// Out of range: nothing changes, nothing is written, returns `Ok(None)`.
    pub async fn delete(&mut self, index: usize) -> StoreResult<Option<Sale>> {
        if index >= self.sales.len() {
            warn!(index, len = self.sales.len(), "Delete ignored: no sale at index");
            return Ok(None);
        }

        let removed = self.sales.remove(index);
        debug!(index, invoice_code = %removed.invoice_code, "Deleted sale");

        self.persist().await?;
        self.notifier.notify(&SaleEvent::Deleted {
            index,
            invoice_code: removed.invoice_code.clone(),
        });

        Ok(Some(removed))
    }

    /// Writes the whole collection to storage.
    ///
    /// On failure the in-memory collection is left as it is; it stays
    /// authoritative for the rest of the session.
    async fn persist(&self) -> StoreResult<()> {
        let json = self.to_document().to_json()?;

        if let Err(err) = self.storage.write(&self.key, &json).await {
            error!(
                backend = self.storage.name(),
                key = %self.key,
                error = %err,
                "Failed to persist sales"
            );
            return Err(err);
        }

        debug!(count = self.sales.len(), bytes = json.len(), "Sales persisted");
        Ok(())
    }
}

impl fmt::Debug for SalesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesStore")
            .field("backend", &self.storage.name())
            .field("key", &self.key)
            .field("len", &self.sales.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::sqlite::{SqliteConfig, SqliteStorage};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;
    use tally_core::{validate, ItemDraft, Money, SaleDraft};

    const KEY: &str = "sales-storage";

    fn sale(code: &str) -> Sale {
        validate(&SaleDraft {
            invoice_code: code.to_string(),
            invoice_date: Some(Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap()),
            items: vec![ItemDraft::new("Test Product", 5, 100)],
            discount: 0,
        })
        .unwrap()
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<SaleEvent>>,
    }

    impl RecordingNotifier {
        fn events(&self) -> Vec<SaleEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: &SaleEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    async fn store_with(codes: &[&str]) -> (SalesStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SalesStore::load(storage.clone(), KEY).await.unwrap();
        for code in codes {
            store.add(sale(code)).await.unwrap();
        }
        (store, storage)
    }

    fn codes(store: &SalesStore) -> Vec<&str> {
        store.sales().iter().map(|s| s.invoice_code.as_str()).collect()
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let (store, storage) = store_with(&[]).await;
        assert!(store.is_empty());
        assert_eq!(store.get(0), None);
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_add_then_get_round_trips() {
        let (mut store, _) = store_with(&["A", "B"]).await;

        let added = sale("C");
        let index = store.add(added.clone()).await.unwrap();

        assert_eq!(index, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(index), Some(&added));
    }

    #[tokio::test]
    async fn test_duplicate_codes_allowed() {
        let (store, _) = store_with(&["SAME", "SAME"]).await;
        assert_eq!(codes(&store), vec!["SAME", "SAME"]);
    }

    #[tokio::test]
    async fn test_update_replaces_only_target() {
        let (mut store, _) = store_with(&["A", "B", "C"]).await;

        let replacement = sale("B2");
        let previous = store.update(1, replacement.clone()).await.unwrap();

        assert_eq!(previous.map(|s| s.invoice_code), Some("B".to_string()));
        assert_eq!(store.get(1), Some(&replacement));
        assert_eq!(codes(&store), vec!["A", "B2", "C"]);
    }

    #[tokio::test]
    async fn test_update_out_of_range_is_noop() {
        let (mut store, storage) = store_with(&["A"]).await;
        let writes = storage.write_count();

        assert_eq!(store.update(1, sale("X")).await.unwrap(), None);
        assert_eq!(store.update(usize::MAX, sale("X")).await.unwrap(), None);

        assert_eq!(codes(&store), vec!["A"]);
        assert_eq!(storage.write_count(), writes);
    }

    #[tokio::test]
    async fn test_delete_shifts_later_sales() {
        let (mut store, _) = store_with(&["A", "B", "C", "D"]).await;

        let removed = store.delete(1).await.unwrap();

        assert_eq!(removed.map(|s| s.invoice_code), Some("B".to_string()));
        assert_eq!(store.len(), 3);
        assert_eq!(codes(&store), vec!["A", "C", "D"]);
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_noop() {
        let (mut store, storage) = store_with(&["A", "B"]).await;
        let writes = storage.write_count();

        assert_eq!(store.delete(2).await.unwrap(), None);

        assert_eq!(codes(&store), vec!["A", "B"]);
        assert_eq!(storage.write_count(), writes);
    }

    #[tokio::test]
    async fn test_get_out_of_range_is_none() {
        let (store, _) = store_with(&["A"]).await;
        assert!(store.get(0).is_some());
        assert!(store.get(1).is_none());
        assert!(store.get(usize::MAX).is_none());
    }

    #[tokio::test]
    async fn test_every_mutation_persists() {
        let (mut store, storage) = store_with(&["A"]).await;
        assert_eq!(storage.write_count(), 1);

        store.update(0, sale("A2")).await.unwrap();
        assert_eq!(storage.write_count(), 2);

        store.delete(0).await.unwrap();
        assert_eq!(storage.write_count(), 3);

        let json = storage.read(KEY).await.unwrap().unwrap();
        assert!(SalesDocument::from_json(&json).unwrap().sales.is_empty());
    }

    #[tokio::test]
    async fn test_reload_restores_same_positions() {
        let storage = Arc::new(SqliteStorage::new(SqliteConfig::in_memory()).await.unwrap());

        let mut store = SalesStore::load(storage.clone(), KEY).await.unwrap();
        store.add(sale("FIRST")).await.unwrap();
        let added = sale("PERSIST-001");
        let index = store.add(added.clone()).await.unwrap();

        let reloaded = SalesStore::load(storage, KEY).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(index), Some(&added));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_memory_change() {
        let (store, storage) = store_with(&["A"]).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store.with_notifier(notifier.clone());

        storage.set_fail_writes(true);
        let err = store.add(sale("B")).await.unwrap_err();

        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(codes(&store), vec!["A", "B"]);
        assert!(notifier.events().is_empty());

        // The persisted document still has only the first sale.
        let json = storage.read(KEY).await.unwrap().unwrap();
        assert_eq!(SalesDocument::from_json(&json).unwrap().sales.len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_sees_successful_changes_only() {
        let notifier = Arc::new(RecordingNotifier::default());
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SalesStore::load(storage, KEY)
            .await
            .unwrap()
            .with_notifier(notifier.clone());

        store.add(sale("A")).await.unwrap();
        store.add(sale("B")).await.unwrap();
        store.update(0, sale("A2")).await.unwrap();
        store.update(9, sale("nope")).await.unwrap();
        store.delete(1).await.unwrap();
        store.delete(9).await.unwrap();

        let titles: Vec<&str> = notifier.events().iter().map(SaleEvent::title).collect();
        assert_eq!(
            titles,
            vec![
                "Sale added successfully",
                "Sale added successfully",
                "Sale updated successfully",
                "Sale deleted successfully",
            ]
        );
        assert_eq!(
            notifier.events()[3],
            SaleEvent::Deleted {
                index: 1,
                invoice_code: "B".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_document() {
        let storage = Arc::new(MemoryStorage::with_document(KEY, "not json"));
        let err = SalesStore::load(storage, KEY).await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptDocument { .. }));
    }

    #[tokio::test]
    async fn test_load_accepts_browser_envelope() {
        let json = r#"{"state":{"sales":[{"invoiceCode":"PERSIST-001","invoiceDate":"2023-05-15T00:00:00.000Z","items":[{"productName":"Persistence Test Product","qty":3,"price":150}],"discount":0}]},"version":0}"#;
        let storage = Arc::new(MemoryStorage::with_document(KEY, json));

        let store = SalesStore::load(storage, KEY).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().grand_total(), Money::from_units(450));
    }

    #[tokio::test]
    async fn test_invoice_editing_scenario() {
        let (mut store, _) = store_with(&["TEST-001"]).await;
        assert_eq!(store.get(0).unwrap().grand_total().units(), 500);

        let mut draft = store.get(0).unwrap().to_draft();
        draft.items.push(ItemDraft::new("Second Product", 2, 200));
        store.update(0, validate(&draft).unwrap()).await.unwrap();
        assert_eq!(store.get(0).unwrap().grand_total().units(), 900);

        let mut draft = store.get(0).unwrap().to_draft();
        draft.discount = 50;
        store.update(0, validate(&draft).unwrap()).await.unwrap();
        assert_eq!(store.get(0).unwrap().grand_total().units(), 850);
    }

    #[tokio::test]
    async fn test_add_all_writes_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (store, storage) = store_with(&["A"]).await;
        let mut store = store.with_notifier(notifier.clone());

        let added = store.add_all(vec![sale("B"), sale("C")]).await.unwrap();

        assert_eq!(added, 1..3);
        assert_eq!(codes(&store), vec!["A", "B", "C"]);
        assert_eq!(storage.write_count(), 2);
        assert_eq!(
            notifier.events().iter().map(SaleEvent::index).collect::<Vec<_>>(),
            vec![1, 2]
        );

        assert_eq!(store.add_all(Vec::new()).await.unwrap(), 3..3);
        assert_eq!(storage.write_count(), 2);
    }

    #[tokio::test]
    async fn test_add_all_failure_persists_none() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (store, storage) = store_with(&["A"]).await;
        let mut store = store.with_notifier(notifier.clone());

        storage.set_fail_writes(true);
        assert!(store.add_all(vec![sale("B"), sale("C")]).await.is_err());
        assert!(notifier.events().is_empty());

        let json = storage.read(KEY).await.unwrap().unwrap();
        let persisted: Vec<String> = SalesDocument::from_json(&json)
            .unwrap()
            .sales
            .into_iter()
            .map(|s| s.invoice_code)
            .collect();
        assert_eq!(persisted, vec!["A"]);
    }
}
