use std::fmt::Write;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use crate::model::task::{FilterMode, Task, TaskId};

/// Tasks visible under `mode`, in list order. Never reorders, only omits.
pub fn project(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|t| mode.matches(t)).collect()
}

/// One visible row, with the values the presenter derives for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub due_date: Option<NaiveDate>,
    /// e.g. `Due: 05 Jan 2024`, or `Due: none`
    pub due_label: String,
    pub urgent: bool,
    pub completed: bool,
}

/// Everything a presenter needs to draw the list once
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListView {
    pub filter: FilterMode,
    pub rows: Vec<TaskRow>,
    /// Shown only when nothing is visible and the filter is All
    pub show_empty_state: bool,
    pub total: usize,
    pub pending: usize,
}

impl ListView {
    pub fn ids(&self) -> Vec<TaskId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn row(&self, id: TaskId) -> Option<&TaskRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Project and decorate the list for display
pub fn build_view(tasks: &[Task], mode: FilterMode, today: NaiveDate, date_format: &str) -> ListView {
    let rows: Vec<TaskRow> = project(tasks, mode)
        .into_iter()
        .map(|task| TaskRow {
            id: task.id,
            text: task.text.clone(),
            due_date: task.due_date,
            due_label: due_label(task.due_date, date_format),
            urgent: task.is_urgent(today),
            completed: task.completed,
        })
        .collect();

    ListView {
        filter: mode,
        show_empty_state: rows.is_empty() && mode == FilterMode::All,
        rows,
        total: tasks.len(),
        pending: tasks.iter().filter(|t| !t.completed).count(),
    }
}

pub fn due_label(due_date: Option<NaiveDate>, date_format: &str) -> String {
    match due_date {
        Some(date) => format!("Due: {}", format_date(date, date_format)),
        None => "Due: none".to_string(),
    }
}

/// Format with a user-supplied strftime pattern, falling back to ISO when
/// the pattern is invalid or asks for fields a date does not have.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if !items.iter().any(|i| matches!(i, Item::Error)) {
        let mut out = String::new();
        if write!(out, "{}", date.format_with_items(items.iter())).is_ok() {
            return out;
        }
    }
    date.format("%Y-%m-%d").to_string()
}
