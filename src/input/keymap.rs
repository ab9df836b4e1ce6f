use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on the current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    match mode {
        Mode::Normal => map_normal(key),
        Mode::Drag { .. } => map_drag(key),
        Mode::Menu { .. } => map_menu(key),
        Mode::Form { .. } => map_form(key),
        Mode::Confirm { .. } => map_confirm(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::ClosePanel,
            _ => Action::None,
        },
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('h') | KeyCode::Left => Action::FocusPrevColumn,
        KeyCode::Char('l') | KeyCode::Right => Action::FocusNextColumn,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNextTask,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrevTask,
        KeyCode::Char('g') => Action::JumpToFirstTask,
        KeyCode::Char('G') => Action::JumpToLastTask,
        KeyCode::Char('H') => Action::MoveTaskPrevColumn,
        KeyCode::Char('L') => Action::MoveTaskNextColumn,
        KeyCode::Char('n') => Action::NewTask,
        KeyCode::Char('e') => Action::EditSelectedTask,
        KeyCode::Char('d') => Action::DeleteSelectedTask,
        KeyCode::Char('m') | KeyCode::Enter => Action::ToggleMenu,
        KeyCode::Char(' ') => Action::GrabTask,
        KeyCode::Char('r') => Action::ReloadBoard,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_drag(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::DragPrevColumn,
        KeyCode::Char('l') | KeyCode::Right => Action::DragNextColumn,
        KeyCode::Char('k') | KeyCode::Up => Action::DragUp,
        KeyCode::Char('j') | KeyCode::Down => Action::DragDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::DragDrop,
        KeyCode::Esc | KeyCode::Char('q') => Action::DragCancel,
        _ => Action::None,
    }
}

/// Menu keys. Anything that is not menu navigation counts as an outside
/// interaction and closes the menu.
fn map_menu(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Action::MenuNext,
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => Action::MenuPrev,
        KeyCode::Enter => Action::MenuSelect,
        _ => Action::MenuClose,
    }
}

fn map_form(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Tab | KeyCode::Down => Action::InputNextField,
        KeyCode::BackTab | KeyCode::Up => Action::InputPrevField,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputHome,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputEnd,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputDeleteWord
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputCancel,
        KeyCode::Char(c) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        _ => Action::None,
    }
}

fn map_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        _ => Action::Deny,
    }
}
