use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::model::task::{FilterMode, TaskId};
use crate::ops::filter::{ListView, TaskRow};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AddedJson {
    pub id: TaskId,
}

#[derive(Serialize)]
pub struct ToggledJson {
    pub id: TaskId,
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Pad `s` with spaces to `width` terminal columns
pub fn pad_display(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// `  3 [x] ! text  Due: 05 Jan 2024`, with the id right-aligned to
/// `id_width` and the text padded to `text_width` columns
pub fn format_row(row: &TaskRow, id_width: usize, text_width: usize) -> String {
    let check = if row.completed { 'x' } else { ' ' };
    let urgent = if row.urgent { '!' } else { ' ' };
    format!(
        "{:>id_width$} [{}] {} {}  {}",
        row.id.to_string(),
        check,
        urgent,
        pad_display(&row.text, text_width),
        row.due_label,
    )
}

/// One line per visible row, columns aligned by display width
pub fn format_list(view: &ListView) -> Vec<String> {
    if view.show_empty_state {
        return vec!["No tasks yet. Add one with `ck add <text>`.".to_string()];
    }
    let id_width = view
        .rows
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(1);
    let text_width = view
        .rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.text.as_str()))
        .max()
        .unwrap_or(0);
    view.rows
        .iter()
        .map(|r| format_row(r, id_width, text_width).trim_end().to_string())
        .collect()
}

/// `3 of 5 pending`, plus the filter when it is not All
pub fn format_summary(view: &ListView) -> String {
    let filter = if view.filter == FilterMode::All {
        String::new()
    } else {
        format!(", showing {}", view.filter)
    };
    format!("{} of {} pending{}", view.pending, view.total, filter)
}
