//! Remote store seam.
//!
//! The library view never talks to the network directly. Front ends hand it
//! an implementation of [`LibraryStore`] (the HTTP client in production, a
//! recording mock in tests).

use futures_util::future::BoxFuture;

use crate::types::{CatalogResult, EntryId, EntryPayload, LibraryEntry};

/// Failure reported by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("store returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Abstract connection to the remote game-organizer service.
///
/// Arguments are owned so the returned futures borrow only `self`; the view
/// clones its `Arc` into `'static` tasks.
pub trait LibraryStore: Send + Sync {
    /// Searches the external catalog by name.
    fn search_catalog(&self, query: String) -> BoxFuture<'_, Result<Vec<CatalogResult>, StoreError>>;

    /// Returns the whole owned collection.
    fn fetch_library(&self) -> BoxFuture<'_, Result<Vec<LibraryEntry>, StoreError>>;

    /// Upserts an entry, keyed by its external identifier when present.
    fn save_entry(&self, payload: EntryPayload) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Removes an entry.
    fn delete_entry(&self, id: EntryId) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Overwrites `listOrder` for exactly `ordered_ids`, numbering from 0.
    fn persist_reorder(&self, ordered_ids: Vec<EntryId>) -> BoxFuture<'_, Result<(), StoreError>>;
}
