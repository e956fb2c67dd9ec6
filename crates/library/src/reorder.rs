//! Manual reorder of the active group.

use tracing::warn;

use crate::types::{EntryId, LibraryEntry};

/// A rendering surface that may offer drag-to-reorder.
///
/// Any reorderable list widget qualifies; on gesture completion it hands the
/// active group's identifiers, in their new visual order, to
/// [`LibraryView::submit_reorder`](crate::LibraryView::submit_reorder).
pub trait ReorderSurface {
    fn supports_drag(&self) -> bool;
}

/// Assigns `listOrder` = position in `visual_order` to each matching entry.
///
/// Identifiers with no local entry are skipped. Returns how many entries were
/// updated. Applying the same order twice yields the same assignments.
pub fn reconcile(collection: &mut [LibraryEntry], visual_order: &[EntryId]) -> usize {
    let mut applied = 0;
    for (position, id) in visual_order.iter().enumerate() {
        let Some(entry) = collection.iter_mut().find(|e| e.id == *id) else {
            warn!(id, "reorder references unknown entry, skipping");
            continue;
        };
        entry.list_order = Some(position_to_order(position));
        applied += 1;
    }
    applied
}

fn position_to_order(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}
