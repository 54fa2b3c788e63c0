use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use log::{info, warn};

use crate::io::codec::{self, DecodeError};
use crate::io::persistence::{PersistenceAdapter, StorageError};
use crate::model::task::{Task, TaskId};

/// Rejected input. The store is left untouched and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task text cannot be empty")]
    EmptyText,
}

/// Error type for positional moves
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Load,
    Save,
}

impl fmt::Display for PersistOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistOp::Load => write!(f, "load"),
            PersistOp::Save => write!(f, "save"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceFailure {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Storage read or write failed. Non-fatal: the in-memory list stands.
#[derive(Debug, thiserror::Error)]
#[error("could not {op} tasks: {source}")]
pub struct PersistenceWarning {
    pub op: PersistOp,
    pub source: PersistenceFailure,
}

impl PersistenceWarning {
    fn new(op: PersistOp, source: impl Into<PersistenceFailure>) -> Self {
        let warning = PersistenceWarning {
            op,
            source: source.into(),
        };
        warn!("{}", warning);
        warning
    }
}

/// Result of a committed operation plus any persistence warning it raised
#[must_use]
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

impl<T> Outcome<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

/// Where to move a task within the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Top,
    Bottom,
    Before(TaskId),
    After(TaskId),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Sole owner of the ordered task list. Every committed mutation writes the
/// full list through the adapter; a failed write is reported, never rolled
/// back.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    adapter: Box<dyn PersistenceAdapter>,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    /// Load whatever the adapter holds. Never fails: missing, unreadable or
    /// malformed data yields an empty list (with a warning for the latter two).
    pub fn open(mut adapter: Box<dyn PersistenceAdapter>) -> Outcome<Self> {
        let (tasks, warning) = match adapter.load() {
            Ok(None) => (Vec::new(), None),
            Ok(Some(bytes)) => match codec::decode(&bytes) {
                Ok(tasks) => (tasks, None),
                Err(e) => (Vec::new(), Some(PersistenceWarning::new(PersistOp::Load, e))),
            },
            Err(e) => (Vec::new(), Some(PersistenceWarning::new(PersistOp::Load, e))),
        };
        info!("opened task list with {} tasks", tasks.len());

        // Decoded ids never exceed TaskId::MAX_STORED
        let next_id = tasks.iter().map(|t| t.id.0).max().map_or(1, |max| max.saturating_add(1));
        Outcome {
            value: TaskStore {
                tasks,
                next_id,
                adapter,
            },
            warning,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Read-only view in list order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Owned copy in list order
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a pending task and return its id.
    pub fn add(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<Outcome<TaskId>, ValidationError> {
        let text = validate_text(text)?;
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task::new(id, text, due_date));
        Ok(self.commit(id))
    }

    /// Flip `completed`. Returns the new state, or `None` if the id is absent.
    pub fn toggle_completed(&mut self, id: TaskId) -> Outcome<Option<bool>> {
        let state = self.find_mut(id).map(|task| {
            task.completed = !task.completed;
            task.completed
        });
        self.commit(state)
    }

    /// Replace a task's text. Returns whether the id was found.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<Outcome<bool>, ValidationError> {
        let text = validate_text(new_text)?;
        let found = match self.find_mut(id) {
            Some(task) => {
                task.text = text;
                true
            }
            None => false,
        };
        Ok(self.commit(found))
    }

    /// Set or clear the due date. Returns whether the id was found.
    pub fn set_due_date(&mut self, id: TaskId, due_date: Option<NaiveDate>) -> Outcome<bool> {
        let found = match self.find_mut(id) {
            Some(task) => {
                task.due_date = due_date;
                true
            }
            None => false,
        };
        self.commit(found)
    }

    /// Remove a task. Idempotent; returns whether anything was removed.
    pub fn delete(&mut self, id: TaskId) -> Outcome<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        self.commit(removed)
    }

    /// Replace the list order with `new_order`.
    ///
    /// Unknown ids and repeats are dropped. Tasks missing from `new_order`
    /// keep their relative order and go to the end, so the set of tasks is
    /// always exactly the set before the call.
    pub fn reorder(&mut self, new_order: &[TaskId]) -> Outcome<()> {
        let known: HashSet<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        let mut placed = HashSet::with_capacity(known.len());
        let mut order: Vec<TaskId> = new_order
            .iter()
            .copied()
            .filter(|id| known.contains(id) && placed.insert(*id))
            .collect();
        let dropped = new_order.len() - order.len();
        if dropped > 0 {
            warn!("reorder ignored {} unknown or repeated ids", dropped);
        }
        order.extend(
            self.tasks
                .iter()
                .map(|t| t.id)
                .filter(|id| !placed.contains(id)),
        );

        let mut by_id: HashMap<TaskId, Task> = self.tasks.drain(..).map(|t| (t.id, t)).collect();
        self.tasks = order.iter().filter_map(|id| by_id.remove(id)).collect();
        self.commit(())
    }

    /// Move one task relative to the list or to another task.
    pub fn move_task(
        &mut self,
        id: TaskId,
        position: InsertPosition,
    ) -> Result<Outcome<()>, MoveError> {
        let mut order = self.ids();
        let idx = order
            .iter()
            .position(|&t| t == id)
            .ok_or(MoveError::NotFound(id))?;
        if let InsertPosition::Before(anchor) | InsertPosition::After(anchor) = position {
            if !self.contains(anchor) {
                return Err(MoveError::NotFound(anchor));
            }
            if anchor == id {
                return Ok(self.commit(()));
            }
        }

        order.remove(idx);
        insert_at(&mut order, id, position);
        Ok(self.reorder(&order))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn commit<T>(&mut self, value: T) -> Outcome<T> {
        Outcome {
            value,
            warning: self.persist(),
        }
    }

    fn persist(&mut self) -> Option<PersistenceWarning> {
        let bytes = match codec::encode(&self.tasks) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Some(PersistenceWarning::new(
                    PersistOp::Save,
                    StorageError::Encode(e),
                ));
            }
        };
        self.adapter
            .save(&bytes)
            .err()
            .map(|e| PersistenceWarning::new(PersistOp::Save, e))
    }
}

fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Insert `id` into `order` at the given position. An anchor that is not in
/// `order` (including `id` itself) puts it at the bottom.
fn insert_at(order: &mut Vec<TaskId>, id: TaskId, position: InsertPosition) {
    let idx = match position {
        InsertPosition::Top => 0,
        InsertPosition::Bottom => order.len(),
        InsertPosition::Before(anchor) => order
            .iter()
            .position(|&t| t == anchor)
            .unwrap_or(order.len()),
        InsertPosition::After(anchor) => order
            .iter()
            .position(|&t| t == anchor)
            .map_or(order.len(), |i| i + 1),
    };
    order.insert(idx, id);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
