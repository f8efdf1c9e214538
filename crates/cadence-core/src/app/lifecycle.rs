//! Completion transition for the task lifecycle.
//!
//! `complete` は冪等: 同じ id への重複呼び出し（リトライ・二重タブ・
//! 二端末）でも次インスタンスはちょうど 1 つしか生まれない。

use std::sync::Arc;

use crate::domain::{EngineError, TaskId, TaskRecord, next_due_date};
use crate::ports::{Clock, CompletionWrite, IdGenerator, StoreError, TaskStore};

/// Outcome of a completion transition.
#[derive(Debug, Clone)]
pub struct Completion {
    pub completed: TaskRecord,

    /// The next instance, when the completed task recurs. `None` for
    /// non-recurring tasks and for duplicate completion calls.
    pub spawned: Option<TaskRecord>,
}

/// Coordinates the complete-and-spawn transition against the store.
///
/// Design:
/// - The coordinator itself is stateless; all shared state lives behind
///   the [`TaskStore`] port.
/// - The store's conditional write is the critical section. The coordinator
///   prepares the spawn optimistically and lets the CAS decide the winner.
#[derive(Clone)]
pub struct LifecycleCoordinator {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl LifecycleCoordinator {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, clock, ids }
    }

    /// Complete `id`, spawning the next instance if the task recurs.
    ///
    /// The next due date is computed from the completion instant, not from
    /// the stale `due_at`: finishing a daily task three days late schedules
    /// the next occurrence relative to *now*, so routine tasks never build
    /// up a backlog of overdue instances.
    pub async fn complete(&self, id: TaskId) -> Result<Completion, EngineError> {
        let task = self.store.get_task(id).await.map_err(into_engine_error)?;

        // Duplicate call: report the existing completion as a no-op.
        if task.completed {
            return Ok(Completion {
                completed: task,
                spawned: None,
            });
        }

        let completion_time = self.clock.now();
        let spawn = if task.recurrence.is_recurring() {
            let next_due = next_due_date(completion_time, task.recurrence)?;
            Some(task.spawn_next(self.ids.generate_task_id(), next_due, completion_time))
        } else {
            None
        };

        let write = self
            .store
            .conditional_complete(id, false, completion_time, spawn.clone())
            .await
            .map_err(into_engine_error)?;

        match write {
            CompletionWrite::Applied { completed } => Ok(Completion {
                completed,
                spawned: spawn,
            }),
            // Lost the race against a concurrent completion; the winner
            // already spawned, so this call reports a no-op.
            CompletionWrite::AlreadyCompleted { existing } => Ok(Completion {
                completed: existing,
                spawned: None,
            }),
        }
    }
}

fn into_engine_error(err: StoreError) -> EngineError {
    match err {
        StoreError::NotFound(id) => EngineError::NotFound(id),
        StoreError::Backend(msg) => EngineError::PersistenceFailed(msg),
    }
}
