//! # tally-store: Persistence Layer for Tally
//!
//! This crate owns the sales collection and keeps it on durable storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  CLI command (add / edit / delete)                                      │
//! │       │  validate() first (tally-core)                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │  SalesStore   │───►│ DocumentStorage  │   │  Notifier   │  │   │
//! │  │   │  (store.rs)   │    │  SqliteStorage   │   │ (notify.rs) │  │   │
//! │  │   │  Vec<Sale>    │    │  FileStorage     │   │ SaleEvent   │  │   │
//! │  │   │  by index     │    │  MemoryStorage   │   │             │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          tally.db (documents table)  or  sales-storage.json     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The sales store: CRUD by positional index
//! - [`storage`] - Storage backends behind the [`DocumentStorage`] trait
//! - [`notify`] - Fire-and-forget change notifications
//! - [`migrations`] - Embedded SQLite migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_store::{SalesStore, SqliteConfig, SqliteStorage, DEFAULT_STORAGE_KEY};
//!
//! let storage = SqliteStorage::new(SqliteConfig::new("path/to/tally.db")).await?;
//! let mut store = SalesStore::load(Arc::new(storage), DEFAULT_STORAGE_KEY).await?;
//!
//! let index = store.add(sale).await?;
//! assert!(store.get(index).is_some());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod notify;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use notify::{Notifier, SaleEvent, TracingNotifier};
pub use storage::file::FileStorage;
pub use storage::memory::MemoryStorage;
pub use storage::sqlite::{SqliteConfig, SqliteStorage};
pub use storage::DocumentStorage;
pub use store::SalesStore;

/// Key the sales document is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "sales-storage";
