//! Task record: the row shape this engine reads and writes.
//!
//! Creation and deletion belong to the surrounding CRUD layer; the engine
//! mutates exactly two things: the completion transition (plus spawn) and
//! the `last_notified_at` reminder mark. Everything else is opaque metadata
//! that a spawned next instance inherits verbatim.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::TaskId;
use super::recurrence::Recurrence;

/// Task priority (opaque to the engine; inherited on spawn).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Creation payload for a task record.
///
/// The store validates this through [`TaskRecord::create`], which is where
/// the `recurrence != none ⇒ due_at present` invariant is enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub due_at: Option<NaiveDateTime>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub reminder_offset_minutes: Option<i64>,
    pub recurrence: Recurrence,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskDraftError {
    #[error("a `{0}` recurring task requires a due date")]
    MissingDueDate(Recurrence),
}

/// A task as stored. Single source of truth for lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,

    /// Required whenever `recurrence` is not `None`.
    pub due_at: Option<NaiveDateTime>,

    /// Flips false -> true exactly once; never reset by this engine.
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,

    pub priority: Priority,
    pub tags: Vec<String>,

    /// Minutes before `due_at` at which a reminder becomes due.
    /// `None` means the task never produces reminders.
    pub reminder_offset_minutes: Option<i64>,

    pub recurrence: Recurrence,

    /// Owned by the external subtask CRUD; a spawned instance starts empty.
    pub subtasks: Vec<TaskId>,

    /// Set by the reminder dispatcher only. `None` means the current due
    /// occurrence has not been notified yet.
    pub last_notified_at: Option<NaiveDateTime>,

    pub created_at: NaiveDateTime,
}

impl TaskRecord {
    /// Build a fresh record from a draft, enforcing the recurrence/due-date
    /// invariant at the boundary.
    pub fn create(
        id: TaskId,
        draft: TaskDraft,
        created_at: NaiveDateTime,
    ) -> Result<Self, TaskDraftError> {
        if draft.recurrence.is_recurring() && draft.due_at.is_none() {
            return Err(TaskDraftError::MissingDueDate(draft.recurrence));
        }
        Ok(Self {
            id,
            title: draft.title,
            due_at: draft.due_at,
            completed: false,
            completed_at: None,
            priority: draft.priority,
            tags: draft.tags,
            reminder_offset_minutes: draft.reminder_offset_minutes,
            recurrence: draft.recurrence,
            subtasks: Vec::new(),
            last_notified_at: None,
            created_at,
        })
    }

    /// Mark this record completed. Called by the store inside its
    /// conditional-write critical section.
    pub fn mark_completed(&mut self, at: NaiveDateTime) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    /// Build the next instance of a recurring task.
    ///
    /// Inherits `title`, `priority`, `tags`, `reminder_offset_minutes` and
    /// `recurrence` verbatim. Subtasks are *not* copied (product decision,
    /// reproduced here as a contract), and the reminder mark starts clear so
    /// the new occurrence is independently eligible.
    pub fn spawn_next(&self, id: TaskId, next_due: NaiveDateTime, at: NaiveDateTime) -> Self {
        Self {
            id,
            title: self.title.clone(),
            due_at: Some(next_due),
            completed: false,
            completed_at: None,
            priority: self.priority,
            tags: self.tags.clone(),
            reminder_offset_minutes: self.reminder_offset_minutes,
            recurrence: self.recurrence,
            subtasks: Vec::new(),
            last_notified_at: None,
            created_at: at,
        }
    }

    /// Reminder selection predicate: due, not yet notified, not completed.
    ///
    /// Completed tasks never match; `last_notified_at` is not consulted
    /// again once a task is done.
    pub fn reminder_due(&self, now: NaiveDateTime) -> bool {
        if self.completed || self.last_notified_at.is_some() {
            return false;
        }
        match (self.due_at, self.reminder_offset_minutes) {
            (Some(due_at), Some(offset)) => due_at - Duration::minutes(offset) <= now,
            _ => false,
        }
    }
}
