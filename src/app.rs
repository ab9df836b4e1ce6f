use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use crate::board::drag::{apply_drop, DropEvent};
use crate::board::slot::Slot;
use crate::board::store::Store;
use crate::board::{Board, ColumnId, Task};
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::ui::card_menu::{CardMenu, MenuItem};
use crate::ui::task_form::FormState;

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Convert a char index to a byte index.
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_offset(self.cursor - 1);
            self.input.remove(byte_idx);
            self.cursor -= 1;
        }
    }

    /// Delete the word before the cursor (Ctrl-W).
    pub fn delete_word(&mut self) {
        let byte_pos = self.byte_offset(self.cursor);
        let before = &self.input[..byte_pos];
        let trimmed = before.trim_end();
        let start_byte = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let start_char = self.input[..start_byte].chars().count();
        self.input.drain(start_byte..byte_pos);
        self.cursor = start_char;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}

/// A drag in progress: where the task was grabbed and where it would land.
///
/// Destination indices use post-removal positions, the same convention as
/// [`crate::board::store::Store::move_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub source: ColumnId,
    pub source_index: usize,
    pub dest: ColumnId,
    pub dest_index: usize,
}

impl DragState {
    /// Grab the task at `source_index`; the initial destination is its own
    /// position.
    pub fn new(source: ColumnId, source_index: usize) -> Self {
        Self {
            source,
            source_index,
            dest: source,
            dest_index: source_index,
        }
    }

    /// Largest valid destination index in the current destination column.
    fn max_dest_index(&self, board: &Board) -> usize {
        let len = board.column(self.dest).items.len();
        if self.dest == self.source {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    /// Steer the destination one column left or right.
    pub fn steer_column(&mut self, board: &Board, forward: bool) {
        let next = if forward { self.dest.next() } else { self.dest.prev() };
        if let Some(col) = next {
            self.dest = col;
            self.dest_index = self.dest_index.min(self.max_dest_index(board));
        }
    }

    /// Steer the destination one slot up or down within the column.
    pub fn steer_row(&mut self, board: &Board, down: bool) {
        if down {
            self.dest_index = (self.dest_index + 1).min(self.max_dest_index(board));
        } else {
            self.dest_index = self.dest_index.saturating_sub(1);
        }
    }

    /// The drop event for releasing the task at the current destination.
    pub fn drop_event(&self) -> DropEvent {
        DropEvent::to(self.source, self.source_index, self.dest, self.dest_index)
    }

    /// The drop event for abandoning the drag (no valid destination).
    pub fn cancel_event(&self) -> DropEvent {
        DropEvent::cancelled(self.source, self.source_index)
    }
}

/// Current interaction mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Drag(DragState),
    Menu { task_id: String },
    Form(FormState),
    Confirm {
        prompt: &'static str,
        target: ConfirmTarget,
    },
    Help,
}

#[derive(Debug, Clone)]
pub enum ConfirmTarget {
    DeleteTask { column: ColumnId, task_id: String },
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Global application state.
pub struct AppState {
    pub mode: Mode,
    pub focused_column: ColumnId,
    pub selected_task: usize,
    /// One menu instance per task id. Each tracks its own open/closed flag;
    /// nothing enforces a single open menu across cards.
    pub menus: HashMap<String, CardMenu>,
    /// Id of the task the form dialog is editing. `None` means the form (if
    /// open) creates a new task. The form itself never sees this.
    pub editing: Option<String>,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            focused_column: ColumnId::Todo,
            selected_task: 0,
            menus: HashMap::new(),
            editing: None,
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
        }
    }

    /// Get a reference to the currently selected task.
    pub fn selected_task_ref<'a>(&self, board: &'a Board) -> Option<&'a Task> {
        board
            .column(self.focused_column)
            .items
            .get(self.selected_task)
    }

    /// The menu instance for a task, created closed on first access.
    pub fn menu(&mut self, task_id: &str) -> &mut CardMenu {
        self.menus.entry(task_id.to_string()).or_default()
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }

    /// Clamp the selected task index to the focused column's length.
    pub fn clamp_selection(&mut self, board: &Board) {
        let len = board.column(self.focused_column).items.len();
        if len == 0 {
            self.selected_task = 0;
        } else if self.selected_task >= len {
            self.selected_task = len - 1;
        }
    }

    /// Drop menu instances whose task no longer exists on the board.
    pub fn prune_menus(&mut self, board: &Board) {
        self.menus.retain(|id, _| board.find_task(id).is_some());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main TUI application loop.
pub fn run<S: Slot>(terminal: &mut DefaultTerminal, store: &mut Store<S>) -> color_eyre::Result<()> {
    let mut state = AppState::new();
    state.clamp_selection(store.board());

    loop {
        state.tick_notification();

        terminal.draw(|f| crate::ui::render(f, store.board(), &state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let action = map_key(key, &state.mode);
                process_action(store, &mut state, action)?;

                if state.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

pub fn process_action<S: Slot>(
    store: &mut Store<S>,
    state: &mut AppState,
    action: Action,
) -> color_eyre::Result<()> {
    match action {
        Action::None => {}

        // Navigation
        Action::FocusPrevColumn
        | Action::FocusNextColumn
        | Action::SelectPrevTask
        | Action::SelectNextTask
        | Action::JumpToFirstTask
        | Action::JumpToLastTask => {
            handle_navigation(store.board(), state, action);
        }

        // Task actions from Normal mode
        Action::NewTask => {
            state.editing = None;
            state.mode = Mode::Form(FormState::create(state.focused_column));
        }
        Action::EditSelectedTask => {
            open_edit_form(store.board(), state);
        }
        Action::DeleteSelectedTask => {
            if let Some(task) = state.selected_task_ref(store.board()) {
                let task_id = task.id.clone();
                state.mode = Mode::Confirm {
                    prompt: "Delete task?",
                    target: ConfirmTarget::DeleteTask {
                        column: state.focused_column,
                        task_id,
                    },
                };
            }
        }
        Action::ToggleMenu => {
            if let Some(task) = state.selected_task_ref(store.board()) {
                let task_id = task.id.clone();
                let menu = state.menu(&task_id);
                menu.toggle();
                state.mode = if state.menu(&task_id).is_open() {
                    Mode::Menu { task_id }
                } else {
                    Mode::Normal
                };
            }
        }
        Action::GrabTask => {
            if state.selected_task_ref(store.board()).is_some() {
                state.mode = Mode::Drag(DragState::new(state.focused_column, state.selected_task));
            }
        }
        Action::MoveTaskPrevColumn | Action::MoveTaskNextColumn => {
            let forward = action == Action::MoveTaskNextColumn;
            quick_move(store, state, forward)?;
        }

        // Drag steering and release
        Action::DragPrevColumn | Action::DragNextColumn | Action::DragUp | Action::DragDown => {
            if let Mode::Drag(drag) = &mut state.mode {
                match action {
                    Action::DragPrevColumn => drag.steer_column(store.board(), false),
                    Action::DragNextColumn => drag.steer_column(store.board(), true),
                    Action::DragUp => drag.steer_row(store.board(), false),
                    Action::DragDown => drag.steer_row(store.board(), true),
                    _ => unreachable!(),
                }
            }
        }
        Action::DragDrop | Action::DragCancel => {
            if let Mode::Drag(drag) = &state.mode {
                let event = if action == Action::DragDrop {
                    drag.drop_event()
                } else {
                    drag.cancel_event()
                };
                let landing = drag.dest;
                let landing_index = drag.dest_index;
                if apply_drop(store, event)? {
                    state.focused_column = landing;
                    state.selected_task = landing_index;
                    state.clamp_selection(store.board());
                    state.notify("Task moved");
                }
            }
            state.mode = Mode::Normal;
        }

        // Card menu
        Action::MenuNext | Action::MenuPrev | Action::MenuSelect | Action::MenuClose => {
            handle_menu(store.board(), state, action);
        }

        // Form input
        Action::InputConfirm => {
            submit_form(store, state)?;
        }
        Action::InputCancel => {
            if let Mode::Form(form) = &mut state.mode {
                form.reset();
            }
            state.editing = None;
            state.mode = Mode::Normal;
        }
        Action::InputChar(_)
        | Action::InputBackspace
        | Action::InputLeft
        | Action::InputRight
        | Action::InputHome
        | Action::InputEnd
        | Action::InputDeleteWord
        | Action::InputNextField
        | Action::InputPrevField => {
            if let Mode::Form(form) = &mut state.mode {
                handle_form_edit(form, action);
            }
        }

        // Confirmation
        Action::Confirm => {
            if let Mode::Confirm { target, .. } = std::mem::replace(&mut state.mode, Mode::Normal) {
                match target {
                    ConfirmTarget::DeleteTask { column, task_id } => {
                        store.delete_task(column, &task_id)?;
                        state.prune_menus(store.board());
                        state.clamp_selection(store.board());
                        state.notify("Task deleted");
                    }
                }
            }
        }
        Action::Deny => {
            state.mode = Mode::Normal;
        }

        // Board-level actions
        Action::ReloadBoard => {
            store.reload()?;
            state.prune_menus(store.board());
            state.clamp_selection(store.board());
            state.notify("Board reloaded");
        }
        Action::ShowHelp => state.mode = Mode::Help,
        Action::ClosePanel => state.mode = Mode::Normal,
        Action::Quit => match &state.mode {
            Mode::Normal => state.should_quit = true,
            _ => state.mode = Mode::Normal,
        },
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handler: navigation
// ---------------------------------------------------------------------------

fn handle_navigation(board: &Board, state: &mut AppState, action: Action) {
    match action {
        Action::FocusPrevColumn => {
            if let Some(col) = state.focused_column.prev() {
                state.focused_column = col;
                state.clamp_selection(board);
            }
        }
        Action::FocusNextColumn => {
            if let Some(col) = state.focused_column.next() {
                state.focused_column = col;
                state.clamp_selection(board);
            }
        }
        Action::SelectPrevTask => {
            if state.selected_task > 0 {
                state.selected_task -= 1;
            }
        }
        Action::SelectNextTask => {
            let len = board.column(state.focused_column).items.len();
            if state.selected_task + 1 < len {
                state.selected_task += 1;
            }
        }
        Action::JumpToFirstTask => {
            state.selected_task = 0;
        }
        Action::JumpToLastTask => {
            let len = board.column(state.focused_column).items.len();
            state.selected_task = len.saturating_sub(1);
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: card menu
// ---------------------------------------------------------------------------

fn handle_menu(board: &Board, state: &mut AppState, action: Action) {
    let Mode::Menu { task_id } = &state.mode else {
        return;
    };
    let task_id = task_id.clone();

    match action {
        Action::MenuNext => state.menu(&task_id).select_next(),
        Action::MenuPrev => state.menu(&task_id).select_prev(),
        Action::MenuSelect => {
            let item = state.menu(&task_id).selected();
            // Explicit selection closes the menu
            state.menu(&task_id).close();
            state.mode = Mode::Normal;
            match item {
                MenuItem::Edit => open_edit_form(board, state),
                MenuItem::Delete => {
                    state.mode = Mode::Confirm {
                        prompt: "Delete task?",
                        target: ConfirmTarget::DeleteTask {
                            column: state.focused_column,
                            task_id,
                        },
                    };
                }
            }
        }
        Action::MenuClose => {
            // Outside interaction closes this menu, and only this one
            state.menu(&task_id).close();
            state.mode = Mode::Normal;
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: form dialog
// ---------------------------------------------------------------------------

/// Open the form prefilled from the selected task, flagging it for update.
fn open_edit_form(board: &Board, state: &mut AppState) {
    if let Some(task) = state.selected_task_ref(board) {
        state.editing = Some(task.id.clone());
        state.mode = Mode::Form(FormState::prefilled(
            state.focused_column,
            &task.title,
            &task.description,
        ));
    }
}

fn handle_form_edit(form: &mut FormState, action: Action) {
    match action {
        Action::InputNextField => form.next_field(),
        Action::InputPrevField => form.prev_field(),
        other => {
            let buf = form.focused_buffer_mut();
            match other {
                Action::InputChar(c) => buf.insert(c),
                Action::InputBackspace => buf.backspace(),
                Action::InputLeft => buf.move_left(),
                Action::InputRight => buf.move_right(),
                Action::InputHome => buf.home(),
                Action::InputEnd => buf.end(),
                Action::InputDeleteWord => buf.delete_word(),
                _ => {}
            }
        }
    }
}

/// Submit the form: create or update depending on the externally held
/// `editing` flag. An empty title rejects the submit and keeps the form open.
fn submit_form<S: Slot>(store: &mut Store<S>, state: &mut AppState) -> color_eyre::Result<()> {
    let submit = {
        let Mode::Form(form) = &mut state.mode else {
            return Ok(());
        };
        let submit = form.submit();
        if submit.is_some() {
            form.reset();
        }
        submit
    };
    let Some(submit) = submit else {
        state.notify_error("Title is required");
        return Ok(());
    };

    match state.editing.take() {
        Some(task_id) => {
            store.edit_task(submit.column, &task_id, submit.title, submit.description)?;
            state.notify("Task updated");
        }
        None => {
            store.add_task(submit.column, submit.title, submit.description)?;
            state.notify("Task added");
        }
    }

    state.mode = Mode::Normal;
    state.clamp_selection(store.board());
    Ok(())
}

// ---------------------------------------------------------------------------
// Handler: quick move (H/L), routed through the drop adapter like any drag
// ---------------------------------------------------------------------------

fn quick_move<S: Slot>(
    store: &mut Store<S>,
    state: &mut AppState,
    forward: bool,
) -> color_eyre::Result<()> {
    let to = match if forward {
        state.focused_column.next()
    } else {
        state.focused_column.prev()
    } {
        Some(to) => to,
        None => return Ok(()),
    };
    if state.selected_task_ref(store.board()).is_none() {
        return Ok(());
    }

    let dest_index = store.board().column(to).items.len();
    let event = DropEvent::to(state.focused_column, state.selected_task, to, dest_index);
    if apply_drop(store, event)? {
        state.focused_column = to;
        state.selected_task = dest_index;
        state.clamp_selection(store.board());
        state.notify("Task moved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::slot::MemorySlot;

    fn store_with(tasks: &[(&str, ColumnId)]) -> Store<MemorySlot> {
        let mut s = Store::open(MemorySlot::empty()).unwrap();
        for (title, column) in tasks {
            s.add_task(*column, *title, "").unwrap();
        }
        s
    }

    // ── TextBuffer ──

    #[test]
    fn text_buffer_insert_and_backspace() {
        let mut buf = TextBuffer::empty();
        buf.insert('h');
        buf.insert('i');
        assert_eq!(buf.input, "hi");
        assert_eq!(buf.cursor, 2);
        buf.backspace();
        assert_eq!(buf.input, "h");
        assert_eq!(buf.cursor, 1);
    }

    #[test]
    fn text_buffer_insert_mid_string() {
        let mut buf = TextBuffer::new("hllo".into());
        buf.home();
        buf.move_right();
        buf.insert('e');
        assert_eq!(buf.input, "hello");
    }

    #[test]
    fn text_buffer_handles_multibyte_chars() {
        let mut buf = TextBuffer::new("héllo".into());
        buf.end();
        assert_eq!(buf.cursor, 5);
        buf.backspace();
        assert_eq!(buf.input, "héll");
        buf.home();
        buf.move_right();
        buf.move_right();
        buf.insert('x');
        assert_eq!(buf.input, "héxll");
    }

    #[test]
    fn text_buffer_delete_word() {
        let mut buf = TextBuffer::new("buy whole milk".into());
        buf.delete_word();
        assert_eq!(buf.input, "buy whole ");
        buf.delete_word();
        assert_eq!(buf.input, "buy ");
    }

    #[test]
    fn text_buffer_blank_detection() {
        assert!(TextBuffer::empty().is_blank());
        assert!(TextBuffer::new("   ".into()).is_blank());
        assert!(!TextBuffer::new(" x ".into()).is_blank());
    }

    // ── DragState ──

    #[test]
    fn drag_starts_at_own_position() {
        let drag = DragState::new(ColumnId::Todo, 2);
        assert_eq!(drag.dest, ColumnId::Todo);
        assert_eq!(drag.dest_index, 2);
    }

    #[test]
    fn drag_steer_clamps_to_destination_column() {
        let s = store_with(&[
            ("a", ColumnId::Todo),
            ("b", ColumnId::Todo),
            ("c", ColumnId::Todo),
        ]);
        let mut drag = DragState::new(ColumnId::Todo, 2);

        // Done is empty: only index 0 is a valid landing slot
        drag.steer_column(s.board(), true);
        drag.steer_column(s.board(), true);
        assert_eq!(drag.dest, ColumnId::Done);
        assert_eq!(drag.dest_index, 0);

        drag.steer_row(s.board(), true);
        assert_eq!(drag.dest_index, 0);
    }

    #[test]
    fn drag_steer_stops_at_board_edges() {
        let s = store_with(&[("a", ColumnId::Todo)]);
        let mut drag = DragState::new(ColumnId::Todo, 0);
        drag.steer_column(s.board(), false);
        assert_eq!(drag.dest, ColumnId::Todo);
    }

    #[test]
    fn drag_same_column_bound_is_one_less_than_cross_column() {
        let s = store_with(&[
            ("a", ColumnId::Todo),
            ("b", ColumnId::Todo),
            ("c", ColumnId::InProgress),
        ]);
        let mut drag = DragState::new(ColumnId::Todo, 0);

        // Same column of 2: post-removal slots are 0..=1
        drag.steer_row(s.board(), true);
        drag.steer_row(s.board(), true);
        assert_eq!(drag.dest_index, 1);

        // Cross column of 1: slots are 0..=1 (index 1 appends)
        drag.steer_column(s.board(), true);
        drag.steer_row(s.board(), true);
        assert_eq!((drag.dest, drag.dest_index), (ColumnId::InProgress, 1));
    }

    // ── process_action: drag lifecycle ──

    #[test]
    fn grab_steer_drop_moves_the_task() {
        let mut s = store_with(&[("a", ColumnId::Todo), ("b", ColumnId::Todo)]);
        let mut state = AppState::new();
        let id = s.board().todo.items[0].id.clone();

        process_action(&mut s, &mut state, Action::GrabTask).unwrap();
        assert!(matches!(state.mode, Mode::Drag(_)));
        process_action(&mut s, &mut state, Action::DragNextColumn).unwrap();
        process_action(&mut s, &mut state, Action::DragDrop).unwrap();

        assert!(matches!(state.mode, Mode::Normal));
        assert_eq!(s.board().in_progress.items[0].id, id);
        assert_eq!(state.focused_column, ColumnId::InProgress);
    }

    #[test]
    fn drag_cancel_leaves_board_untouched() {
        let mut s = store_with(&[("a", ColumnId::Todo)]);
        let mut state = AppState::new();
        let before = s.board().clone();

        process_action(&mut s, &mut state, Action::GrabTask).unwrap();
        process_action(&mut s, &mut state, Action::DragNextColumn).unwrap();
        process_action(&mut s, &mut state, Action::DragCancel).unwrap();

        assert_eq!(*s.board(), before);
        assert!(matches!(state.mode, Mode::Normal));
    }

    #[test]
    fn drop_in_place_does_not_notify_a_move() {
        let mut s = store_with(&[("a", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::GrabTask).unwrap();
        process_action(&mut s, &mut state, Action::DragDrop).unwrap();

        assert!(state.notification.is_none());
    }

    #[test]
    fn grab_on_empty_column_is_ignored() {
        let mut s = store_with(&[]);
        let mut state = AppState::new();
        process_action(&mut s, &mut state, Action::GrabTask).unwrap();
        assert!(matches!(state.mode, Mode::Normal));
    }

    // ── process_action: quick move ──

    #[test]
    fn quick_move_appends_to_next_column() {
        let mut s = store_with(&[("a", ColumnId::Todo), ("b", ColumnId::InProgress)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::MoveTaskNextColumn).unwrap();

        assert!(s.board().todo.items.is_empty());
        assert_eq!(s.board().in_progress.items[1].title, "a");
        assert_eq!(state.focused_column, ColumnId::InProgress);
        assert_eq!(state.selected_task, 1);
    }

    #[test]
    fn quick_move_off_board_edge_is_ignored() {
        let mut s = store_with(&[("a", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::MoveTaskPrevColumn).unwrap();

        assert_eq!(s.board().todo.items.len(), 1);
        assert_eq!(state.focused_column, ColumnId::Todo);
    }

    // ── process_action: form lifecycle ──

    #[test]
    fn new_task_form_submit_creates_in_focused_column() {
        let mut s = store_with(&[]);
        let mut state = AppState::new();
        state.focused_column = ColumnId::InProgress;

        process_action(&mut s, &mut state, Action::NewTask).unwrap();
        for c in "Ship it".chars() {
            process_action(&mut s, &mut state, Action::InputChar(c)).unwrap();
        }
        process_action(&mut s, &mut state, Action::InputNextField).unwrap();
        for c in "today".chars() {
            process_action(&mut s, &mut state, Action::InputChar(c)).unwrap();
        }
        process_action(&mut s, &mut state, Action::InputConfirm).unwrap();

        let items = &s.board().in_progress.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Ship it");
        assert_eq!(items[0].description, "today");
        assert!(matches!(state.mode, Mode::Normal));
    }

    #[test]
    fn form_submit_with_empty_title_stays_open() {
        let mut s = store_with(&[]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::NewTask).unwrap();
        process_action(&mut s, &mut state, Action::InputConfirm).unwrap();

        assert!(matches!(state.mode, Mode::Form(_)));
        assert_eq!(s.board().total_tasks(), 0);
        assert_eq!(state.notification_level, NotificationLevel::Error);
    }

    #[test]
    fn edit_form_updates_existing_task() {
        let mut s = store_with(&[("Old title", ColumnId::Todo)]);
        let mut state = AppState::new();
        let id = s.board().todo.items[0].id.clone();

        process_action(&mut s, &mut state, Action::EditSelectedTask).unwrap();
        assert_eq!(state.editing.as_deref(), Some(id.as_str()));
        // Append to the prefilled title
        process_action(&mut s, &mut state, Action::InputChar('!')).unwrap();
        process_action(&mut s, &mut state, Action::InputConfirm).unwrap();

        assert_eq!(s.board().todo.items[0].title, "Old title!");
        assert_eq!(s.board().todo.items[0].id, id);
        assert_eq!(s.board().total_tasks(), 1);
        assert!(state.editing.is_none());
    }

    #[test]
    fn form_cancel_discards_input_and_editing_flag() {
        let mut s = store_with(&[("keep", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::EditSelectedTask).unwrap();
        process_action(&mut s, &mut state, Action::InputChar('x')).unwrap();
        process_action(&mut s, &mut state, Action::InputCancel).unwrap();

        assert_eq!(s.board().todo.items[0].title, "keep");
        assert!(state.editing.is_none());
        assert!(matches!(state.mode, Mode::Normal));
    }

    // ── process_action: menu and delete ──

    #[test]
    fn menu_toggle_then_delete_via_confirm() {
        let mut s = store_with(&[("doomed", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::ToggleMenu).unwrap();
        assert!(matches!(state.mode, Mode::Menu { .. }));
        process_action(&mut s, &mut state, Action::MenuNext).unwrap();
        process_action(&mut s, &mut state, Action::MenuSelect).unwrap();
        assert!(matches!(state.mode, Mode::Confirm { .. }));
        process_action(&mut s, &mut state, Action::Confirm).unwrap();

        assert!(s.board().todo.items.is_empty());
    }

    #[test]
    fn menu_edit_opens_prefilled_form() {
        let mut s = store_with(&[("titled", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::ToggleMenu).unwrap();
        process_action(&mut s, &mut state, Action::MenuSelect).unwrap();

        match &state.mode {
            Mode::Form(form) => assert_eq!(form.title_text(), "titled"),
            other => panic!("expected form mode, got {other:?}"),
        }
        assert!(state.editing.is_some());
    }

    #[test]
    fn menu_outside_interaction_closes_only_that_menu() {
        let mut s = store_with(&[("a", ColumnId::Todo), ("b", ColumnId::Todo)]);
        let mut state = AppState::new();
        let other_id = s.board().todo.items[1].id.clone();
        // Another card's menu was left open; nothing global may close it
        state.menu(&other_id).toggle();

        process_action(&mut s, &mut state, Action::ToggleMenu).unwrap();
        process_action(&mut s, &mut state, Action::MenuClose).unwrap();

        let own_id = s.board().todo.items[0].id.clone();
        assert!(!state.menu(&own_id).is_open());
        assert!(state.menu(&other_id).is_open());
    }

    #[test]
    fn confirm_deny_keeps_the_task() {
        let mut s = store_with(&[("safe", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::DeleteSelectedTask).unwrap();
        process_action(&mut s, &mut state, Action::Deny).unwrap();

        assert_eq!(s.board().todo.items.len(), 1);
        assert!(matches!(state.mode, Mode::Normal));
    }

    #[test]
    fn delete_clamps_selection() {
        let mut s = store_with(&[("a", ColumnId::Todo), ("b", ColumnId::Todo)]);
        let mut state = AppState::new();
        state.selected_task = 1;

        process_action(&mut s, &mut state, Action::DeleteSelectedTask).unwrap();
        process_action(&mut s, &mut state, Action::Confirm).unwrap();

        assert_eq!(state.selected_task, 0);
    }

    // ── process_action: navigation and misc ──

    #[test]
    fn navigation_clamps_at_edges() {
        let mut s = store_with(&[("a", ColumnId::Todo)]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::FocusPrevColumn).unwrap();
        assert_eq!(state.focused_column, ColumnId::Todo);
        process_action(&mut s, &mut state, Action::FocusNextColumn).unwrap();
        process_action(&mut s, &mut state, Action::FocusNextColumn).unwrap();
        process_action(&mut s, &mut state, Action::FocusNextColumn).unwrap();
        assert_eq!(state.focused_column, ColumnId::Done);
        process_action(&mut s, &mut state, Action::SelectPrevTask).unwrap();
        assert_eq!(state.selected_task, 0);
    }

    #[test]
    fn quit_from_overlay_returns_to_normal_first() {
        let mut s = store_with(&[]);
        let mut state = AppState::new();

        process_action(&mut s, &mut state, Action::ShowHelp).unwrap();
        process_action(&mut s, &mut state, Action::Quit).unwrap();
        assert!(!state.should_quit);
        assert!(matches!(state.mode, Mode::Normal));

        process_action(&mut s, &mut state, Action::Quit).unwrap();
        assert!(state.should_quit);
    }

    #[test]
    fn reload_picks_up_externally_written_state() {
        let mut s = store_with(&[("a", ColumnId::Todo)]);
        let mut state = AppState::new();
        state.selected_task = 0;

        process_action(&mut s, &mut state, Action::ReloadBoard).unwrap();
        assert_eq!(s.board().todo.items.len(), 1);
        assert!(state.notification.is_some());
    }
}
