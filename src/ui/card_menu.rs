//! Per-task contextual menu exposing Edit/Delete behind a toggle.
//!
//! Every task id owns its own `CardMenu` instance; the open/closed flag is
//! tracked per instance and no global single-open-menu rule exists. The menu
//! closes on explicit selection or on any outside interaction.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuItem {
    #[default]
    Edit,
    Delete,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [Self::Edit, Self::Delete];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// Open/closed state and highlighted entry of one task's menu.
#[derive(Debug, Clone, Default)]
pub struct CardMenu {
    open: bool,
    selected: MenuItem,
}

impl CardMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> MenuItem {
        self.selected
    }

    /// Toggle button behavior: closed → open, open → closed. Opening starts
    /// from the first entry.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.selected = MenuItem::default();
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn select_next(&mut self) {
        let idx = MenuItem::ALL.iter().position(|i| *i == self.selected).unwrap_or(0);
        self.selected = MenuItem::ALL[(idx + 1) % MenuItem::ALL.len()];
    }

    pub fn select_prev(&mut self) {
        let idx = MenuItem::ALL.iter().position(|i| *i == self.selected).unwrap_or(0);
        self.selected = MenuItem::ALL[(idx + MenuItem::ALL.len() - 1) % MenuItem::ALL.len()];
    }
}

/// Render an open menu anchored inside its card's area (top-right corner).
pub fn render_card_menu(f: &mut Frame, card_area: Rect, menu: &CardMenu) {
    if !menu.is_open() {
        return;
    }

    let width = 10u16.min(card_area.width);
    let height = (MenuItem::ALL.len() as u16 + 2).min(card_area.height);
    if width < 4 || height < 3 {
        return;
    }
    let x = card_area.x + card_area.width - width;
    let popup_area = Rect::new(x, card_area.y, width, height);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    for (i, item) in MenuItem::ALL.iter().enumerate() {
        if i >= inner.height as usize {
            break;
        }
        let style = if *item == menu.selected() {
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Theme::FG)
        };
        let line = Line::from(Span::styled(format!(" {}", item.label()), style));
        f.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}
