use ratatui::style::{Color, Style};

/// Color theme for kdesk.
///
/// All text and UI chrome uses the terminal's default foreground color
/// (Color::Reset). Only functional signals (drag destination, grabbed card,
/// errors) get color; selection is expressed through border weight and bold.
pub struct Theme;

impl Theme {
    // Base — everything defaults to the terminal's own foreground
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column and card chrome
    pub const COLUMN_BORDER: Color = Color::Reset;
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_TITLE: Color = Color::Reset;

    // Functional colors
    pub const GRABBED: Color = Color::Magenta;
    pub const DROP_MARKER: Color = Color::Cyan;
    pub const STATUS_ERROR: Color = Color::Red;

    // Form
    pub const FIELD_LABEL: Color = Color::Reset;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }
}
