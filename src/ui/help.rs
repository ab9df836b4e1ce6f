use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;

pub fn render_help(f: &mut Frame, area: Rect) {
    let panel_area = super::centered_rect(area, 60, 80, 46, 20);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Kanban Desk Help ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let key = Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD);
    let dim = Theme::dim_style();
    let heading = Style::default()
        .fg(Theme::FG)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let entry = |k: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(k, key), Span::styled(desc, dim)])
    };

    let lines = vec![
        Line::from(Span::styled("Navigate", heading)),
        entry("  h / l       ", "Switch columns"),
        entry("  j / k       ", "Move between tasks"),
        entry("  g / G       ", "First / last task"),
        Line::from(""),
        Line::from(Span::styled("Tasks", heading)),
        entry("  n           ", "New task"),
        entry("  e           ", "Edit task"),
        entry("  d           ", "Delete task"),
        entry("  m / Enter   ", "Task menu"),
        entry("  H / L       ", "Send task left/right"),
        Line::from(""),
        Line::from(Span::styled("Move (Space)", heading)),
        entry("  h j k l     ", "Steer destination"),
        entry("  Enter       ", "Drop here"),
        entry("  Esc         ", "Cancel move"),
        Line::from(""),
        Line::from(Span::styled("Board", heading)),
        entry("  r           ", "Reload from disk"),
        entry("  q           ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        )),
    ];

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
