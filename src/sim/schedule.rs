//! Cancellable delayed tasks
//!
//! Phase changes that happen "later" (countdown steps, returning to idle
//! after a round) are queued here and fired from `tick`, never by sleeping.
//! Each task gets a `TaskId`; any task can be cancelled individually, and
//! input handlers call `cancel_all` before queueing anything new.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TaskId,
    due_at: f64,
    task: T,
}

/// Delayed tasks, fired in due order (ties in scheduling order)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    /// Seconds advanced since creation
    clock: f64,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            clock: 0.0,
            next_id: 1,
        }
    }

    /// Queue `task` to fire after `delay` seconds (negative delays clamp to 0)
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_at: self.clock + f64::from(delay.max(0.0)),
            task,
        });
        id
    }

    /// Drop one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::trace!("Cancelling {} pending task(s)", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Seconds until `id` fires, if still pending
    pub fn remaining(&self, id: TaskId) -> Option<f32> {
        self.pending
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.due_at - self.clock).max(0.0) as f32)
    }

    /// Advance time by `dt` and return every task that came due
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.clock += f64::from(dt.max(0.0));

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_at <= self.clock {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|p| p.task).collect()
    }
}
