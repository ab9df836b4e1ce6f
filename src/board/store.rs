//! The board state store: the single owner of the in-memory board and the
//! only legal mutation entry points. Every mutation writes through to the
//! storage slot immediately; there is no batching or dirty tracking.

use super::codec::{self, CodecError};
use super::slot::{Slot, SlotError};
use super::{Board, ColumnId, Task};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("index {index} out of range for column '{column}' ({len} tasks)")]
    IndexOutOfRange {
        column: ColumnId,
        index: usize,
        len: usize,
    },
}

/// Authoritative board state plus its persistence slot.
///
/// The slot is injected so tests run against [`super::slot::MemorySlot`];
/// nothing else in the crate writes board state anywhere.
pub struct Store<S: Slot> {
    board: Board,
    slot: S,
}

impl<S: Slot> Store<S> {
    /// Open a store over `slot`. Missing or undecodable contents fall back
    /// to the seed board; only slot I/O failures surface.
    pub fn open(slot: S) -> Result<Self, StoreError> {
        let board = Self::load(&slot)?;
        Ok(Self { board, slot })
    }

    fn load(slot: &S) -> Result<Board, StoreError> {
        Ok(match slot.read()? {
            Some(text) => codec::decode(&text),
            None => Board::seed(),
        })
    }

    /// Re-read the board from the slot, discarding in-memory state.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.board = Self::load(&self.slot)?;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Serialize and write the current board to the slot.
    fn save(&mut self) -> Result<(), StoreError> {
        let text = codec::encode(&self.board)?;
        self.slot.write(&text)?;
        tracing::debug!(tasks = self.board.total_tasks(), "board persisted");
        Ok(())
    }

    /// Create a task at the end of `column` and persist. Returns the
    /// created task.
    pub fn add_task(
        &mut self,
        column: ColumnId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Task, StoreError> {
        let task = Task::new(title, description);
        self.board.column_mut(column).items.push(task.clone());
        self.save()?;
        Ok(task)
    }

    /// Update a task's title, description, and `updated_at`, then persist.
    /// Silent no-op (no write) when no task in `column` has `task_id`.
    pub fn edit_task(
        &mut self,
        column: ColumnId,
        task_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), StoreError> {
        let Some(task) = self
            .board
            .column_mut(column)
            .items
            .iter_mut()
            .find(|t| t.id == task_id)
        else {
            return Ok(());
        };
        task.title = title.into();
        task.description = description.into();
        task.touch();
        self.save()
    }

    /// Remove a matching task from `column` and persist. A missing id leaves
    /// the board unchanged (the write still happens, matching the original
    /// delete handler).
    pub fn delete_task(&mut self, column: ColumnId, task_id: &str) -> Result<(), StoreError> {
        self.board
            .column_mut(column)
            .items
            .retain(|t| t.id != task_id);
        self.save()
    }

    /// Transfer the task at `from_index` to position `to_index` in `to`.
    /// Splice semantics: the destination index addresses the list as it
    /// stands after the removal. An exact same-position move is a no-op with
    /// no persistence write. `updated_at` is not refreshed by a move.
    pub fn move_task(
        &mut self,
        from: ColumnId,
        from_index: usize,
        to: ColumnId,
        to_index: usize,
    ) -> Result<(), StoreError> {
        let from_len = self.board.column(from).items.len();
        let to_len = self.board.column(to).items.len();

        if from_index >= from_len {
            return Err(StoreError::IndexOutOfRange {
                column: from,
                index: from_index,
                len: from_len,
            });
        }
        // Same-column insertion happens post-removal, so the upper bound is
        // one less than for a cross-column move.
        let to_bound = if from == to { to_len - 1 } else { to_len };
        if to_index > to_bound {
            return Err(StoreError::IndexOutOfRange {
                column: to,
                index: to_index,
                len: to_len,
            });
        }

        if from == to && from_index == to_index {
            return Ok(());
        }

        let task = self.board.column_mut(from).items.remove(from_index);
        self.board.column_mut(to).items.insert(to_index, task);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::slot::MemorySlot;
    use chrono::TimeDelta;

    fn store() -> Store<MemorySlot> {
        Store::open(MemorySlot::empty()).unwrap()
    }

    #[test]
    fn open_empty_slot_starts_from_seed() {
        let s = store();
        assert_eq!(*s.board(), Board::seed());
    }

    #[test]
    fn open_malformed_slot_falls_back_to_seed() {
        let s = Store::open(MemorySlot::with_contents("not valid json")).unwrap();
        assert_eq!(*s.board(), Board::seed());
    }

    #[test]
    fn open_decodes_previously_saved_board() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "persisted", "").unwrap();
        let slot = MemorySlot::with_contents(
            codec::encode(s.board()).unwrap(),
        );

        let reopened = Store::open(slot).unwrap();
        assert_eq!(reopened.board().todo.items[0].title, "persisted");
    }

    // ── add_task ──

    #[test]
    fn add_task_appends_with_equal_timestamps() {
        // Scenario: addTask("todo", "Buy milk", "2%")
        let mut s = store();
        let task = s.add_task(ColumnId::Todo, "Buy milk", "2%").unwrap();

        let items = &s.board().todo.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Buy milk");
        assert_eq!(items[0].description, "2%");
        assert_eq!(items[0].created_at, items[0].updated_at);
        assert_eq!(items[0].id, task.id);
    }

    #[test]
    fn add_task_appends_to_the_end() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "first", "").unwrap();
        let second = s.add_task(ColumnId::Todo, "second", "").unwrap();
        assert_eq!(s.board().todo.items[1].id, second.id);
    }

    #[test]
    fn add_task_ids_are_unique_across_the_board() {
        let mut s = store();
        for column in ColumnId::ALL {
            for i in 0..10 {
                s.add_task(column, format!("task {i}"), "").unwrap();
            }
        }
        let mut ids: Vec<String> = s
            .board()
            .columns()
            .flat_map(|(_, col)| col.items.iter().map(|t| t.id.clone()))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn add_task_writes_through_once() {
        let mut s = store();
        s.add_task(ColumnId::Done, "t", "").unwrap();
        assert_eq!(s.slot.writes(), 1);
        assert!(s.slot.contents().unwrap().contains("\"t\""));
    }

    // ── edit_task ──

    #[test]
    fn edit_task_updates_fields_and_refreshes_updated_at() {
        // Scenario: editTask("todo", id, "New title", "New desc")
        let mut s = store();
        let task = s.add_task(ColumnId::Todo, "Old", "old").unwrap();
        // Backdate so the refresh is strictly observable
        s.board.todo.items[0].updated_at = task.updated_at - TimeDelta::seconds(60);
        let before = s.board().todo.items[0].updated_at;

        s.edit_task(ColumnId::Todo, &task.id, "New title", "New desc")
            .unwrap();

        let edited = &s.board().todo.items[0];
        assert_eq!(edited.title, "New title");
        assert_eq!(edited.description, "New desc");
        assert!(edited.updated_at > before);
        assert_eq!(edited.created_at, task.created_at);
    }

    #[test]
    fn edit_task_missing_id_is_a_silent_no_op_without_a_write() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "keep", "").unwrap();
        let writes_before = s.slot.writes();
        let board_before = s.board().clone();

        s.edit_task(ColumnId::Todo, "nonexistent-id", "x", "y").unwrap();

        assert_eq!(*s.board(), board_before);
        assert_eq!(s.slot.writes(), writes_before);
    }

    #[test]
    fn edit_task_only_searches_the_named_column() {
        let mut s = store();
        let task = s.add_task(ColumnId::Done, "elsewhere", "").unwrap();

        s.edit_task(ColumnId::Todo, &task.id, "changed", "").unwrap();

        assert_eq!(s.board().done.items[0].title, "elsewhere");
    }

    // ── delete_task ──

    #[test]
    fn delete_task_removes_by_id() {
        let mut s = store();
        let a = s.add_task(ColumnId::Todo, "a", "").unwrap();
        let b = s.add_task(ColumnId::Todo, "b", "").unwrap();

        s.delete_task(ColumnId::Todo, &a.id).unwrap();

        let items = &s.board().todo.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, b.id);
    }

    #[test]
    fn delete_task_missing_id_leaves_board_unchanged() {
        // Scenario: deleteTask("todo", "nonexistent-id")
        let mut s = store();
        s.add_task(ColumnId::Todo, "keep", "").unwrap();
        let board_before = s.board().clone();

        s.delete_task(ColumnId::Todo, "nonexistent-id").unwrap();

        assert_eq!(*s.board(), board_before);
    }

    #[test]
    fn delete_task_persists_even_when_nothing_matched() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "keep", "").unwrap();
        let writes_before = s.slot.writes();

        s.delete_task(ColumnId::Todo, "nonexistent-id").unwrap();

        assert_eq!(s.slot.writes(), writes_before + 1);
    }

    // ── move_task ──

    #[test]
    fn move_task_transfers_across_columns() {
        // Scenario: create T in todo; moveTask("todo", 0, "done", 0)
        let mut s = store();
        let task = s.add_task(ColumnId::Todo, "T", "").unwrap();

        s.move_task(ColumnId::Todo, 0, ColumnId::Done, 0).unwrap();

        assert!(s.board().todo.items.is_empty());
        assert_eq!(s.board().done.items[0].id, task.id);
    }

    #[test]
    fn move_task_preserves_count_and_task_fields() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "a", "").unwrap();
        let moved = s.add_task(ColumnId::Todo, "b", "desc").unwrap();
        s.add_task(ColumnId::InProgress, "c", "").unwrap();
        let total = s.board().total_tasks();

        s.move_task(ColumnId::Todo, 1, ColumnId::InProgress, 0).unwrap();

        assert_eq!(s.board().total_tasks(), total);
        let landed = &s.board().in_progress.items[0];
        assert_eq!(landed.id, moved.id);
        assert_eq!(landed.title, "b");
        assert_eq!(landed.description, "desc");
    }

    #[test]
    fn move_task_does_not_refresh_updated_at() {
        let mut s = store();
        let task = s.add_task(ColumnId::Todo, "T", "").unwrap();

        s.move_task(ColumnId::Todo, 0, ColumnId::Done, 0).unwrap();

        assert_eq!(s.board().done.items[0].updated_at, task.updated_at);
    }

    #[test]
    fn move_task_same_column_reorders() {
        let mut s = store();
        let a = s.add_task(ColumnId::Todo, "a", "").unwrap();
        let b = s.add_task(ColumnId::Todo, "b", "").unwrap();
        let c = s.add_task(ColumnId::Todo, "c", "").unwrap();

        // Drag "a" below "c"
        s.move_task(ColumnId::Todo, 0, ColumnId::Todo, 2).unwrap();

        let order: Vec<&str> = s.board().todo.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec![b.id.as_str(), c.id.as_str(), a.id.as_str()]);
    }

    #[test]
    fn move_task_same_position_is_a_no_op_with_no_write() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "a", "").unwrap();
        s.add_task(ColumnId::Todo, "b", "").unwrap();
        let board_before = s.board().clone();
        let persisted_before = s.slot.contents().unwrap().to_string();
        let writes_before = s.slot.writes();

        s.move_task(ColumnId::Todo, 1, ColumnId::Todo, 1).unwrap();

        assert_eq!(*s.board(), board_before);
        assert_eq!(s.slot.contents().unwrap(), persisted_before);
        assert_eq!(s.slot.writes(), writes_before);
    }

    #[test]
    fn move_task_source_index_out_of_range_errors() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "only", "").unwrap();

        let err = s.move_task(ColumnId::Todo, 5, ColumnId::Done, 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::IndexOutOfRange { column: ColumnId::Todo, index: 5, len: 1 }
        ));
    }

    #[test]
    fn move_task_dest_index_out_of_range_errors() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "only", "").unwrap();

        // Done is empty: only index 0 (append) is valid
        let err = s.move_task(ColumnId::Todo, 0, ColumnId::Done, 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::IndexOutOfRange { column: ColumnId::Done, index: 1, len: 0 }
        ));
    }

    #[test]
    fn move_task_cross_column_end_index_appends() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "mover", "").unwrap();
        s.add_task(ColumnId::Done, "already there", "").unwrap();

        // to_index == destination length appends
        s.move_task(ColumnId::Todo, 0, ColumnId::Done, 1).unwrap();
        assert_eq!(s.board().done.items[1].title, "mover");
    }

    #[test]
    fn move_task_same_column_last_slot_is_in_bounds() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "a", "").unwrap();
        s.add_task(ColumnId::Todo, "b", "").unwrap();

        // Post-removal the column has one item, so index 1 is the end
        s.move_task(ColumnId::Todo, 0, ColumnId::Todo, 1).unwrap();
        assert_eq!(s.board().todo.items[1].title, "a");
    }

    #[test]
    fn move_task_same_column_past_end_errors() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "a", "").unwrap();
        s.add_task(ColumnId::Todo, "b", "").unwrap();

        assert!(s.move_task(ColumnId::Todo, 0, ColumnId::Todo, 2).is_err());
    }

    #[test]
    fn move_task_failed_move_does_not_write() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "a", "").unwrap();
        let writes_before = s.slot.writes();

        let _ = s.move_task(ColumnId::Todo, 9, ColumnId::Done, 0);

        assert_eq!(s.slot.writes(), writes_before);
    }

    // ── persistence coupling ──

    #[test]
    fn every_mutation_writes_through_immediately() {
        let mut s = store();
        let t = s.add_task(ColumnId::Todo, "a", "").unwrap();
        assert_eq!(s.slot.writes(), 1);
        s.edit_task(ColumnId::Todo, &t.id, "b", "").unwrap();
        assert_eq!(s.slot.writes(), 2);
        s.move_task(ColumnId::Todo, 0, ColumnId::Done, 0).unwrap();
        assert_eq!(s.slot.writes(), 3);
        s.delete_task(ColumnId::Done, &t.id).unwrap();
        assert_eq!(s.slot.writes(), 4);
    }

    #[test]
    fn persisted_state_matches_board_after_each_mutation() {
        let mut s = store();
        s.add_task(ColumnId::InProgress, "wip", "half done").unwrap();

        let persisted = codec::try_decode(s.slot.contents().unwrap()).unwrap();
        assert_eq!(persisted, *s.board());
    }

    #[test]
    fn reload_discards_unpersisted_in_memory_state() {
        let mut s = store();
        s.add_task(ColumnId::Todo, "kept", "").unwrap();
        // Mutate behind the store's back, bypassing save
        s.board.todo.items.clear();

        s.reload().unwrap();
        assert_eq!(s.board().todo.items.len(), 1);
        assert_eq!(s.board().todo.items[0].title, "kept");
    }
}
