use ratatui::style::Color;

/// Colors for the list, keyed by what they mark rather than by hue
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Header title, dragged row, input cursor
    pub accent: Color,
    /// Hints, due labels, completed text
    pub muted: Color,
    /// Overdue or due-today labels, error messages
    pub urgent: Color,
    /// Completed checkbox
    pub done: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            accent: Color::Rgb(0xFB, 0x41, 0x96),
            muted: Color::Rgb(0x7D, 0x78, 0xBF),
            urgent: Color::Rgb(0xFF, 0x44, 0x44),
            done: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
        }
    }
}
