//! Error types for library view operations.

use std::fmt;

use crate::store::StoreError;
use crate::types::EntryId;

/// Remote write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Save,
    Delete,
    Reorder,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOp::Save => "save",
            WriteOp::Delete => "delete",
            WriteOp::Reorder => "reorder",
        })
    }
}

/// Errors produced by the library view.
///
/// None of these are fatal: local state stays usable and the triggering
/// action can be retried.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The collection or a search could not be retrieved.
    #[error("fetch failed: {0}")]
    Fetch(#[source] StoreError),

    /// The store rejected or never received a write. Local state is kept.
    #[error("{op} failed: {source}")]
    Persist {
        op: WriteOp,
        #[source]
        source: StoreError,
    },

    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("reorder unavailable: {0}")]
    ReorderUnavailable(&'static str),
}

impl LibraryError {
    pub(crate) fn persist(op: WriteOp) -> impl FnOnce(StoreError) -> Self {
        move |source| LibraryError::Persist { op, source }
    }
}

/// Unrecognized filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseCriteriaError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseCriteriaError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
