use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::{AppState, Mode, NotificationLevel};
use crate::board::Board;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState, board: &Board) {
    // Confirm takes over the entire bar
    if let Mode::Confirm { prompt, .. } = &state.mode {
        let line = Line::from(Span::styled(
            format!(" {prompt} (y/n) "),
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ));
        f.render_widget(Paragraph::new(line).style(Theme::status_style()), area);
        return;
    }

    // Three-zone layout for all other modes
    let left = build_left_zone(state);
    let right = build_right_zone(state, board);

    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let total_width = area.width as usize;

    let center_avail = total_width.saturating_sub(left_width + right_width);
    let center = build_center_zone(state, center_avail);

    let mut spans = left;
    spans.extend(center);
    spans.extend(right);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Theme::status_style()),
        area,
    );
}

/// Left zone: mode badge + app name.
fn build_left_zone(state: &AppState) -> Vec<Span<'_>> {
    let mode_str = match &state.mode {
        Mode::Normal => "NORMAL",
        Mode::Drag(_) => "MOVE",
        Mode::Menu { .. } => "MENU",
        Mode::Form(_) => "FORM",
        Mode::Help => "HELP",
        Mode::Confirm { .. } => "",
    };

    vec![
        Span::styled(
            format!(" {mode_str} "),
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
        Span::styled("Kanban Desk ", Theme::dim_style()),
    ]
}

/// Right zone: focused column title + selection position.
fn build_right_zone<'a>(state: &'a AppState, board: &'a Board) -> Vec<Span<'a>> {
    let col = board.column(state.focused_column);
    let count = col.items.len();
    let pos = if count > 0 {
        format!(" {}/{}", state.selected_task + 1, count)
    } else {
        " 0".to_string()
    };
    vec![
        Span::styled(
            format!("{}[{}]", col.title, count),
            Theme::dim_style(),
        ),
        Span::styled(pos, Style::default().fg(Theme::FG)),
        Span::raw(" "),
    ]
}

/// Center zone: notification text, centered in the available space.
fn build_center_zone<'a>(state: &'a AppState, avail_width: usize) -> Vec<Span<'a>> {
    if let Some(ref notif) = state.notification {
        let notif_width = notif.width();
        let color = match state.notification_level {
            NotificationLevel::Info => Theme::FG,
            NotificationLevel::Error => Theme::STATUS_ERROR,
        };

        if notif_width >= avail_width {
            let truncated: String = notif.chars().take(avail_width).collect();
            return vec![Span::styled(truncated, Style::default().fg(color))];
        }

        let pad_total = avail_width - notif_width;
        let pad_left = pad_total / 2;
        let pad_right = pad_total - pad_left;

        vec![
            Span::raw(" ".repeat(pad_left)),
            Span::styled(notif.as_str(), Style::default().fg(color)),
            Span::raw(" ".repeat(pad_right)),
        ]
    } else {
        vec![Span::raw(" ".repeat(avail_width))]
    }
}
