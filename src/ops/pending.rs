use std::time::{Duration, Instant};

use crate::model::task::TaskId;

/// A deletion waiting for its row's fade-out to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: TaskId,
    pub deadline: Instant,
}

/// Deletions scheduled to commit after a fixed delay. Each entry can be
/// cancelled until it falls due; the caller drives time by passing `now`.
#[derive(Debug, Clone)]
pub struct DeleteQueue {
    delay: Duration,
    pending: Vec<PendingDelete>,
}

impl DeleteQueue {
    pub fn new(delay: Duration) -> Self {
        DeleteQueue {
            delay,
            pending: Vec::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `id` for deletion. A repeat request for an id that is
    /// already pending keeps the first deadline and returns false.
    pub fn schedule(&mut self, id: TaskId, now: Instant) -> bool {
        if self.is_pending(id) {
            return false;
        }
        self.pending.push(PendingDelete {
            id,
            deadline: now + self.delay,
        });
        true
    }

    /// Returns whether anything was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every id whose deadline has passed, in the order
    /// they were scheduled.
    pub fn due(&mut self, now: Instant) -> Vec<TaskId> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.deadline <= now);
        self.pending = waiting;
        due.into_iter().map(|p| p.id).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.deadline).min()
    }
}
