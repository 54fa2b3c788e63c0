use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::ops::filter::TaskRow;
use crate::tui::app::App;
use crate::tui::theme::Theme;

/// How a row is drawn, beyond its own data
#[derive(Debug, Clone, Copy, Default)]
struct RowFlags {
    selected: bool,
    dragged: bool,
    pending_delete: bool,
}

/// Render the task list. Also records the list geometry the mouse handler
/// and the reorder rule hit-test against.
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;
    let count = app.rows().len();
    let height = area.height as usize;

    // Keep the cursor on screen
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    app.scroll_offset = app.scroll_offset.min(count.saturating_sub(height));
    app.session
        .set_list_origin(f32::from(area.y) - app.scroll_offset as f32);

    let bg = app.theme.background;
    if app.session.view().show_empty_state {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No tasks yet. Press a to add one.",
            Style::default().fg(app.theme.muted).bg(bg),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let dragged = app.session.dragged();
    let width = area.width as usize;
    let lines: Vec<Line> = app
        .rows()
        .into_iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(i, row)| {
            let flags = RowFlags {
                selected: dragged.map_or(i == app.cursor, |d| d == row.id),
                dragged: dragged == Some(row.id),
                pending_delete: app.session.is_pending_delete(row.id),
            };
            row_line(row, flags, &app.theme, width)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// `[x] text ........ Due: 05 Jan 2024`, due label flush right
fn row_line(row: &TaskRow, flags: RowFlags, theme: &Theme, width: usize) -> Line<'static> {
    let check = if row.completed { "[x] " } else { "[ ] " };
    let used = check.width() + row.text.width() + row.due_label.width() + 1;
    let fill = width.saturating_sub(used).max(1);

    let check_style = if row.completed {
        Style::default().fg(theme.done)
    } else {
        Style::default().fg(theme.text)
    };
    let text_style = if row.completed {
        Style::default()
            .fg(theme.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text_bright)
    };
    let due_style = if row.urgent {
        Style::default().fg(theme.urgent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    };

    let mut line = Line::from(vec![
        Span::styled(check, check_style),
        Span::styled(row.text.clone(), text_style),
        Span::raw(" ".repeat(fill)),
        Span::styled(row.due_label.clone(), due_style),
    ]);
    if flags.selected {
        line = line.patch_style(Style::default().bg(theme.selection_bg));
    }
    if flags.dragged {
        line = line.patch_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
    }
    if flags.pending_delete {
        line = line.patch_style(Style::default().add_modifier(Modifier::DIM));
    }
    line
}
