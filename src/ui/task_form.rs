//! The modal create/edit dialog: a title field (required) and a description
//! field (optional).
//!
//! The form holds no task identity. Whether a submit creates or updates is
//! the caller's decision, carried in `AppState::editing`; the form only
//! receives prefilled initial values and the target column, and hands back
//! the field values on submit.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::app::TextBuffer;
use crate::board::ColumnId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

/// Values handed to the caller's submit handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmit {
    pub column: ColumnId,
    pub title: String,
    pub description: String,
}

/// Controlled state of the dialog's two fields.
#[derive(Debug, Clone)]
pub struct FormState {
    column: ColumnId,
    title: TextBuffer,
    description: TextBuffer,
    field: FormField,
}

impl FormState {
    /// An empty form for creating a task in `column`.
    pub fn create(column: ColumnId) -> Self {
        Self {
            column,
            title: TextBuffer::empty(),
            description: TextBuffer::empty(),
            field: FormField::Title,
        }
    }

    /// A form prefilled with an existing task's values.
    pub fn prefilled(column: ColumnId, title: &str, description: &str) -> Self {
        Self {
            column,
            title: TextBuffer::new(title.to_string()),
            description: TextBuffer::new(description.to_string()),
            field: FormField::Title,
        }
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn title_text(&self) -> &str {
        &self.title.input
    }

    pub fn description_text(&self) -> &str {
        &self.description.input
    }

    /// The buffer the cursor is in.
    pub fn focused_buffer_mut(&mut self) -> &mut TextBuffer {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        // Two fields: forward and backward are the same swap
        self.next_field();
    }

    /// Current field values, or `None` when the required title is missing.
    pub fn submit(&self) -> Option<FormSubmit> {
        if self.title.is_blank() {
            return None;
        }
        Some(FormSubmit {
            column: self.column,
            title: self.title.input.clone(),
            description: self.description.input.clone(),
        })
    }

    /// Reset both fields to empty strings, called on close and on
    /// successful submit.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.field = FormField::Title;
    }
}

/// Render the dialog centered over the board. `editing` selects the title
/// caption only; the form is otherwise identical for create and update.
pub fn render_form(f: &mut Frame, area: Rect, form: &FormState, editing: bool) {
    let panel_area = super::centered_rect(area, 50, 40, 40, 9);

    f.render_widget(Clear, panel_area);

    let caption = if editing { " Edit Task " } else { " New Task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            caption,
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} · Enter save · Esc cancel ", form.column().as_str()),
            Theme::dim_style(),
        )))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height < 4 {
        return;
    }

    render_field(
        f,
        Rect::new(inner.x, inner.y, inner.width, 2),
        "Title",
        &form.title,
        form.field() == FormField::Title,
    );
    render_field(
        f,
        Rect::new(inner.x, inner.y + 3, inner.width, 2),
        "Description",
        &form.description,
        form.field() == FormField::Description,
    );
}

fn render_field(f: &mut Frame, area: Rect, label: &str, buf: &TextBuffer, focused: bool) {
    let label_style = if focused {
        Style::default()
            .fg(Theme::FIELD_LABEL)
            .add_modifier(Modifier::BOLD)
    } else {
        Theme::dim_style()
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(label, label_style))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let mut spans = vec![Span::raw(buf.input.as_str())];
    if focused {
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(area.x, area.y + 1, area.width, 1),
    );
}
