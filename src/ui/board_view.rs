use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState,
};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::card_menu;
use super::theme::Theme;
use crate::app::{AppState, DragState, Mode};
use crate::board::{Board, ColumnId, Task};

/// Vertical cells per card: 3 inner lines + 2 border lines.
const CARD_HEIGHT: u16 = 5;

/// Truncate `text` to at most `avail` display columns, grapheme-safe,
/// appending an ellipsis when anything was cut.
pub(crate) fn truncate_to_width(text: &str, avail: usize) -> String {
    if text.width() <= avail {
        return text.to_string();
    }
    let max_cols = avail.saturating_sub(1); // room for '…'
    let truncated: String = text
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= max_cols).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    format!("{truncated}…")
}

/// The visual slot the drop marker occupies in the destination column.
///
/// Destination indices are post-removal, but the grabbed card is still
/// rendered in its source column, so a same-column destination at or past
/// the source shifts down by one card.
pub(crate) fn marker_slot(drag: &DragState) -> usize {
    if drag.dest == drag.source && drag.dest_index >= drag.source_index {
        drag.dest_index + 1
    } else {
        drag.dest_index
    }
}

pub fn render_board(f: &mut Frame, area: Rect, board: &Board, state: &AppState) {
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (i, (id, _)) in board.columns().enumerate() {
        render_column(f, col_areas[i], board, id, state);
    }
}

fn render_column(f: &mut Frame, area: Rect, board: &Board, id: ColumnId, state: &AppState) {
    let col = board.column(id);
    let is_focused = state.focused_column == id;
    let drag = match &state.mode {
        Mode::Drag(drag) => Some(drag),
        _ => None,
    };
    let is_drop_target = drag.is_some_and(|d| d.dest == id);

    let header_line = Line::from(vec![
        Span::styled(
            format!(" {} ", col.title),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({})", col.items.len()), Theme::dim_style()),
    ]);

    let border_color = if is_drop_target {
        Theme::DROP_MARKER
    } else {
        Theme::COLUMN_BORDER
    };
    let focused_mod = if is_focused {
        Modifier::BOLD
    } else {
        Modifier::empty()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(focused_mod))
        .border_type(BorderType::Rounded)
        .title(header_line)
        .padding(Padding::new(1, 1, 0, 0));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let max_visible = (inner.height / CARD_HEIGHT) as usize;

    // Keep the selection on screen in the focused column
    let selected = if is_focused { state.selected_task } else { 0 };
    let scroll_offset = if col.items.len() > max_visible && selected >= max_visible {
        selected - max_visible + 1
    } else {
        0
    };

    for (idx, task) in col.items.iter().enumerate().skip(scroll_offset) {
        if idx - scroll_offset >= max_visible {
            break;
        }
        let y = inner.y + ((idx - scroll_offset) as u16 * CARD_HEIGHT);
        let card_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);

        let is_selected = is_focused && state.selected_task == idx && drag.is_none();
        let is_grabbed = drag.is_some_and(|d| d.source == id && d.source_index == idx);
        render_card(f, card_area, task, is_selected, is_grabbed);

        // Any open menu renders, whoever's it is
        if let Some(menu) = state.menus.get(&task.id) {
            card_menu::render_card_menu(f, card_area, menu);
        }
    }

    // Insertion marker for the drag destination
    if let Some(drag) = drag.filter(|d| d.dest == id) {
        let slot = marker_slot(drag).saturating_sub(scroll_offset);
        let y = inner.y + (slot as u16).saturating_mul(CARD_HEIGHT);
        if y < inner.y + inner.height {
            let marker = "▸".repeat(inner.width as usize);
            f.render_widget(
                Paragraph::new(Span::styled(marker, Style::default().fg(Theme::DROP_MARKER))),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
    }

    if col.items.len() > max_visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(col.items.len()).position(scroll_offset);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool, is_grabbed: bool) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let selected_mod = if is_selected || is_grabbed {
        Modifier::BOLD
    } else {
        Modifier::empty()
    };
    let border_color = if is_grabbed {
        Theme::GRABBED
    } else {
        Theme::CARD_BORDER
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(selected_mod))
        .border_type(if is_selected || is_grabbed {
            BorderType::Thick
        } else {
            BorderType::Rounded
        });

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 || inner.width < 2 {
        return;
    }

    let avail = inner.width as usize;

    // Line 1: title
    let title = truncate_to_width(&task.title, avail.saturating_sub(1));
    f.render_widget(
        Paragraph::new(Span::styled(
            format!(" {title}"),
            Style::default().fg(Theme::CARD_TITLE).add_modifier(selected_mod),
        )),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );

    // Line 2: description
    if inner.height >= 2 && !task.description.is_empty() {
        let desc = truncate_to_width(&task.description, avail.saturating_sub(1));
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {desc}"), Theme::dim_style())),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }

    // Line 3: updated date, comment count on the right
    if inner.height >= 3 {
        let date = format_card_date(task.updated_at);
        let comments = format!("c:{}", task.comments.len());
        let pad = avail.saturating_sub(date.width() + comments.width() + 2);
        let line = Line::from(vec![
            Span::styled(format!(" {date}"), Theme::dim_style()),
            Span::raw(" ".repeat(pad)),
            Span::styled(comments, Theme::dim_style()),
        ]);
        f.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, inner.y + 2, inner.width, 1),
        );
    }
}

/// The card footer date, e.g. "9 March 2024".
pub fn format_card_date(at: DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}
