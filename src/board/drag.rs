//! Bridge between the drag interaction and the store's move operation.
//!
//! The interaction layer (keyboard grab/steer/drop in the TUI) only reports
//! where a drag started and where it ended. Cancelled drops, dropped-in-place
//! gestures, and indices that no longer exist are all absorbed here so a drag
//! can never crash the UI or cause a spurious persistence write.

use super::slot::Slot;
use super::store::{Store, StoreError};
use super::ColumnId;

/// The result of a completed drag gesture. `destination` is `None` when the
/// drop target was invalid (the drag was cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub source: ColumnId,
    pub source_index: usize,
    pub destination: Option<(ColumnId, usize)>,
}

impl DropEvent {
    /// A drag released over a valid position.
    pub fn to(source: ColumnId, source_index: usize, dest: ColumnId, dest_index: usize) -> Self {
        Self {
            source,
            source_index,
            destination: Some((dest, dest_index)),
        }
    }

    /// A drag released with no valid destination.
    pub fn cancelled(source: ColumnId, source_index: usize) -> Self {
        Self {
            source,
            source_index,
            destination: None,
        }
    }
}

/// Translate a drop event into a store move. Returns whether the board
/// changed.
///
/// Policy: no destination → ignore entirely; destination identical to the
/// source → ignore (no write, no re-render churn); stale indices → warned
/// no-op; anything else delegates to [`Store::move_task`].
pub fn apply_drop<S: Slot>(store: &mut Store<S>, event: DropEvent) -> Result<bool, StoreError> {
    let Some((dest, dest_index)) = event.destination else {
        return Ok(false);
    };
    if dest == event.source && dest_index == event.source_index {
        return Ok(false);
    }
    match store.move_task(event.source, event.source_index, dest, dest_index) {
        Ok(()) => Ok(true),
        Err(StoreError::IndexOutOfRange { column, index, len }) => {
            tracing::warn!(%column, index, len, "drop event out of range, ignoring");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
