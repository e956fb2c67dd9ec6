//! Split of the derived order into the active and finished groups.

use serde::Serialize;

use crate::types::{EntryId, LibraryEntry};

/// Which displayed group an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Backlog and in-progress games.
    Active,
    /// Completed and dropped games.
    Finished,
}

impl Partition {
    /// Title and message shown in place of an empty group.
    pub fn empty_state(self) -> (&'static str, &'static str) {
        match self {
            Partition::Active => (
                "Your queue is empty",
                "Add games from the backlog to get started.",
            ),
            Partition::Finished => (
                "No history yet",
                "Completed or dropped games will show up here.",
            ),
        }
    }
}

/// The two displayed groups, each in derived order.
///
/// Empty groups are ordinary values; whether the collection has been loaded
/// at all is tracked by the view's load state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayGroups {
    pub active: Vec<LibraryEntry>,
    pub finished: Vec<LibraryEntry>,
}

impl DisplayGroups {
    pub fn group(&self, partition: Partition) -> &[LibraryEntry] {
        match partition {
            Partition::Active => &self.active,
            Partition::Finished => &self.finished,
        }
    }

    /// Number of entries shown across both groups.
    pub fn len(&self) -> usize {
        self.active.len() + self.finished.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.finished.is_empty()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.active.iter().chain(&self.finished).any(|e| e.id == id)
    }
}

/// Splits `ordered` in a single pass, preserving relative order.
pub fn partition(ordered: Vec<LibraryEntry>) -> DisplayGroups {
    let mut groups = DisplayGroups::default();
    for entry in ordered {
        match entry.partition() {
            Partition::Active => groups.active.push(entry),
            Partition::Finished => groups.finished.push(entry),
        }
    }
    groups
}
