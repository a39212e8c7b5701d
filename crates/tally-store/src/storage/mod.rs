//! # Storage Module
//!
//! Durable homes for the sales document.
//!
//! ## Backend Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SalesStore                                                             │
//! │       │                                                                 │
//! │       │  storage.write("sales-storage", json)                           │
//! │       ▼                                                                 │
//! │  Arc<dyn DocumentStorage>                                               │
//! │  ├── SqliteStorage  - documents table in tally.db (default)             │
//! │  ├── FileStorage    - <data dir>/sales-storage.json                     │
//! │  └── MemoryStorage  - HashMap, for tests                                │
//! │                                                                         │
//! │  The store only ever reads once (startup) and rewrites the whole        │
//! │  document on each change. Backends never see individual sales.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Backends
//!
//! - [`sqlite::SqliteStorage`]
//! - [`file::FileStorage`]
//! - [`memory::MemoryStorage`]

pub mod file;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;

/// A key/value store of whole JSON documents.
///
/// ## Contract
/// - `read` of a key never written returns `Ok(None)`
/// - `write` replaces the previous document for the key entirely; once it
///   returns `Ok`, a later `read` (in this or a new process) sees the new
///   document
/// - A failed `write` leaves the previous document readable
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Returns the document stored under `key`, if any.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `document` under `key`, replacing what was there.
    async fn write(&self, key: &str, document: &str) -> StoreResult<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
