//! In-memory task store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::domain::{TaskId, TaskRecord};
use crate::ports::{CompletionWrite, StoreError, TaskStore};

/// In-memory store state.
#[derive(Default)]
struct InMemoryStoreState {
    /// All task records (single source of truth).
    records: HashMap<TaskId, TaskRecord>,
}

/// In-memory [`TaskStore`] for development and tests.
///
/// Every operation takes the single state mutex for its whole duration, so
/// check-then-act sequences (the completion CAS, select-and-mark) are
/// naturally atomic. A production store gets the same effect from row locks
/// or a conditional `UPDATE ... RETURNING`.
#[derive(Default)]
pub struct InMemoryTaskStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for tests and status printing).
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get_task(&self, id: TaskId) -> Result<TaskRecord, StoreError> {
        let state = self.state.lock().await;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_task(&self, record: TaskRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.records.insert(record.id, record);
        Ok(())
    }

    async fn conditional_complete(
        &self,
        id: TaskId,
        expected_completed: bool,
        completed_at: NaiveDateTime,
        spawn: Option<TaskRecord>,
    ) -> Result<CompletionWrite, StoreError> {
        let mut state = self.state.lock().await;

        // Check-then-act under the lock: this is the completion critical
        // section.
        let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if record.completed != expected_completed {
            return Ok(CompletionWrite::AlreadyCompleted {
                existing: record.clone(),
            });
        }

        record.mark_completed(completed_at);
        let completed = record.clone();

        // Same commit as the flag flip; a reader never sees one without
        // the other.
        if let Some(spawn) = spawn {
            state.records.insert(spawn.id, spawn);
        }

        Ok(CompletionWrite::Applied { completed })
    }

    async fn claim_due_reminders(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        let mut state = self.state.lock().await;

        // Select-and-mark in one pass while holding the lock, so a second
        // concurrent claim cannot pick up the same due occurrence.
        let mut batch = Vec::new();
        for record in state.records.values_mut() {
            if record.reminder_due(now) {
                record.last_notified_at = Some(now);
                batch.push(record.clone());
            }
        }

        // HashMap order is arbitrary; keep batches stable for callers.
        batch.sort_by_key(|r| (r.due_at, r.id));
        Ok(batch)
    }
}
