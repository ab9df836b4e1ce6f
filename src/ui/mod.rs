pub mod board_view;
pub mod card_menu;
pub mod help;
pub mod status_bar;
pub mod task_form;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::board::Board;

/// Create a centered rect within `area` using percentage-based sizing with
/// minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(f: &mut Frame, board: &Board, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    // Main board area (open card menus render with their cards)
    board_view::render_board(f, chunks[0], board, state);

    // Status bar
    status_bar::render_status_bar(f, chunks[1], state, board);

    // Overlays
    match &state.mode {
        Mode::Form(form) => {
            task_form::render_form(f, f.area(), form, state.editing.is_some());
        }
        Mode::Help => {
            help::render_help(f, f.area());
        }
        _ => {}
    }
}
