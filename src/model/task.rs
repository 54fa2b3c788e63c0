use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identity of a task. Allocated by the store, never reused while
/// the task exists, and independent of the task's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Largest id accepted from storage: the biggest integer every JSON
    /// reader holds exactly, leaving ample room to allocate above it.
    pub const MAX_STORED: u64 = (1 << 53) - 1;
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(TaskId)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty
    pub text: String,
    /// Calendar date only, no time component
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

impl Task {
    /// Create a pending task. Callers are responsible for trimming and
    /// rejecting empty text.
    pub fn new(id: TaskId, text: String, due_date: Option<NaiveDate>) -> Self {
        Task {
            id,
            text,
            due_date,
            completed: false,
        }
    }

    /// Incomplete and due today or earlier.
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due <= today)
    }
}

/// Which tasks the list view shows. Display-only; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterMode {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Pending => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }

    /// Cycle all → pending → completed → all
    pub fn next(self) -> FilterMode {
        match self {
            FilterMode::All => FilterMode::Pending,
            FilterMode::Pending => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Pending => "pending",
            FilterMode::Completed => "completed",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "pending" | "todo" => Ok(FilterMode::Pending),
            "completed" | "done" => Ok(FilterMode::Completed),
            other => Err(format!(
                "unknown filter '{}' (expected all, pending or completed)",
                other
            )),
        }
    }
}
