//! Owned-game library: filtering, sorting, status grouping and manual order.
//!
//! This crate holds the **view-model** of a personal game backlog. It has no
//! UI or transport dependencies; front ends provide a [`LibraryStore`]
//! implementation (see `gameshelf-client` for the HTTP one) and render the
//! [`DisplayGroups`] that [`LibraryView`] keeps up to date.
//!
//! # Pipeline
//!
//! collection -> [`derive`] (filter + stable sort) -> [`partition`] (active /
//! finished). Genre options are recomputed from the whole collection whenever
//! it changes.
//!
//! # Mutations
//!
//! - **Reorder** applies locally, then persists the new order
//! - **Edit** and **Delete** apply locally, then write; failures are not rolled back
//! - **Create** saves, then reloads (the store assigns the id)

pub mod error;
pub mod filter;
pub mod partition;
pub mod reorder;
pub mod store;
pub mod types;
pub mod view;

pub use error::{LibraryError, ParseCriteriaError, WriteOp};
pub use filter::{
    FilterCriteria, GenreFilter, SortMode, StatusFilter, derive, genre_options,
    retain_genre_selection,
};
pub use partition::{DisplayGroups, Partition, partition};
pub use reorder::{ReorderSurface, reconcile};
pub use store::{LibraryStore, StoreError};
pub use types::{
    CatalogResult, EntryId, EntryPayload, EntryUpdate, GameStatus, LibraryEntry, Rating,
    RatingOutOfRange,
};
pub use view::{FetchApplied, FetchOutcome, LibraryView, LoadState, PendingFetch, PendingWrite};
