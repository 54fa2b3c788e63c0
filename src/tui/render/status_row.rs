use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputField, Mode};

const NAVIGATE_HINT: &str = "a add  e edit  d delete  f filter  q quit";
const DRAG_HINT: &str = "release to drop  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.muted).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor = Span::styled("\u{258C}", Style::default().fg(app.theme.accent).bg(bg)); // ▌

    let (mut spans, hint) = match app.mode {
        Mode::Navigate if app.session.dragged().is_some() => (Vec::new(), DRAG_HINT),
        Mode::Navigate => match &app.status {
            Some(msg) => (
                vec![Span::styled(msg.clone(), Style::default().fg(app.theme.urgent).bg(bg))],
                "",
            ),
            None => (Vec::new(), NAVIGATE_HINT),
        },
        Mode::Add => {
            let mut spans = vec![
                Span::styled("add: ", dim),
                Span::styled(app.edit.text.clone(), bright),
            ];
            if app.edit.field == InputField::Text {
                spans.push(cursor.clone());
            }
            spans.push(Span::styled("  due: ", dim));
            spans.push(Span::styled(app.edit.due.clone(), bright));
            if app.edit.field == InputField::Due {
                spans.push(cursor);
            }
            (spans, "Tab field  Enter save  Esc cancel")
        }
        Mode::Edit(_) => (
            vec![
                Span::styled("edit: ", dim),
                Span::styled(app.edit.text.clone(), bright),
                cursor,
            ],
            "Enter save  Esc cancel",
        ),
    };

    // Hint flush right when there is room, otherwise dropped
    let content_width: usize = spans.iter().map(|s| s.content.width()).sum();
    let hint_width = hint.width();
    if spans.is_empty() {
        spans.push(Span::styled(hint, dim));
    } else if !hint.is_empty() && content_width + hint_width + 2 <= width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
