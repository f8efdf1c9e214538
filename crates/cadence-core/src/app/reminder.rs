//! Due-reminder selection.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::{EngineError, TaskRecord};
use crate::ports::{Clock, StoreError, TaskStore};

/// Claims due reminders from the store on behalf of a periodic trigger.
///
/// The returned batch has already been marked (`last_notified_at = now`)
/// inside the store's critical section, so each due occurrence shows up in
/// at most one batch, no matter how many pollers run concurrently. Actual
/// delivery happens after this returns, outside any lock.
#[derive(Clone)]
pub struct ReminderDispatcher {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl ReminderDispatcher {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Select-and-mark every task whose reminder threshold has elapsed.
    ///
    /// `now` defaults to the clock's current instant. The batch is
    /// unbounded here; capping per poll cycle is delivery-side policy.
    pub async fn poll(&self, now: Option<NaiveDateTime>) -> Result<Vec<TaskRecord>, EngineError> {
        let now = now.unwrap_or_else(|| self.clock.now());
        self.store
            .claim_due_reminders(now)
            .await
            .map_err(|err| match err {
                StoreError::NotFound(id) => EngineError::NotFound(id),
                StoreError::Backend(msg) => EngineError::PersistenceFailed(msg),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recurrence, TaskDraft, TaskId};
    use crate::impls::InMemoryTaskStore;
    use crate::ports::{CompletionWrite, FixedClock};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use ulid::Ulid;

    /// Store double standing in for a storage outage.
    struct OutageStore;

    #[async_trait]
    impl TaskStore for OutageStore {
        async fn get_task(&self, _id: TaskId) -> Result<TaskRecord, StoreError> {
            Err(StoreError::Backend("storage outage".into()))
        }

        async fn create_task(&self, _record: TaskRecord) -> Result<(), StoreError> {
            Err(StoreError::Backend("storage outage".into()))
        }

        async fn conditional_complete(
            &self,
            _id: TaskId,
            _expected_completed: bool,
            _completed_at: NaiveDateTime,
            _spawn: Option<TaskRecord>,
        ) -> Result<CompletionWrite, StoreError> {
            Err(StoreError::Backend("storage outage".into()))
        }

        async fn claim_due_reminders(
            &self,
            _now: NaiveDateTime,
        ) -> Result<Vec<TaskRecord>, StoreError> {
            Err(StoreError::Backend("storage outage".into()))
        }
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    async fn seed(store: &InMemoryTaskStore, draft: TaskDraft) -> TaskId {
        let record =
            TaskRecord::create(TaskId::from_ulid(Ulid::new()), draft, at(2026, 3, 1, 9, 0))
                .unwrap();
        let id = record.id;
        store.create_task(record).await.unwrap();
        id
    }

    fn standup(due: NaiveDateTime) -> TaskDraft {
        TaskDraft {
            title: "standup".into(),
            due_at: Some(due),
            reminder_offset_minutes: Some(15),
            recurrence: Recurrence::Daily,
            ..TaskDraft::default()
        }
    }

    #[tokio::test]
    async fn poll_claims_due_tasks_and_marks_them() {
        let store = Arc::new(InMemoryTaskStore::new());
        let id = seed(&store, standup(at(2026, 3, 2, 9, 0))).await;
        let dispatcher =
            ReminderDispatcher::new(store.clone(), Arc::new(FixedClock::new(at(2026, 3, 2, 8, 45))));

        let batch = dispatcher.poll(None).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, id);
        assert_eq!(batch[0].last_notified_at, Some(at(2026, 3, 2, 8, 45)));
    }

    #[tokio::test]
    async fn tasks_before_their_threshold_are_not_claimed() {
        let store = Arc::new(InMemoryTaskStore::new());
        seed(&store, standup(at(2026, 3, 2, 9, 0))).await;
        let dispatcher = ReminderDispatcher::new(
            store.clone(),
            Arc::new(FixedClock::new(at(2026, 3, 2, 8, 0))),
        );

        let batch = dispatcher.poll(Some(at(2026, 3, 2, 8, 44))).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn a_due_occurrence_is_claimed_at_most_once() {
        let store = Arc::new(InMemoryTaskStore::new());
        seed(&store, standup(at(2026, 3, 2, 9, 0))).await;
        let clock = FixedClock::new(at(2026, 3, 2, 8, 45));
        let dispatcher = ReminderDispatcher::new(store.clone(), Arc::new(clock.clone()));

        let first = dispatcher.poll(None).await.unwrap();
        assert_eq!(first.len(), 1);

        // later poll of the same occurrence: already marked
        clock.set(at(2026, 3, 2, 8, 50));
        let second = dispatcher.poll(None).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn storage_outage_surfaces_as_persistence_failed() {
        let dispatcher = ReminderDispatcher::new(
            Arc::new(OutageStore),
            Arc::new(FixedClock::new(at(2026, 3, 2, 8, 45))),
        );

        let err = dispatcher.poll(None).await.unwrap_err();
        assert!(matches!(err, EngineError::PersistenceFailed(_)));
    }

    #[tokio::test]
    async fn concurrent_polls_never_share_an_occurrence() {
        let store = Arc::new(InMemoryTaskStore::new());
        seed(&store, standup(at(2026, 3, 2, 9, 0))).await;
        let dispatcher = ReminderDispatcher::new(
            store.clone(),
            Arc::new(FixedClock::new(at(2026, 3, 2, 8, 45))),
        );

        let (a, b) = tokio::join!(dispatcher.poll(None), dispatcher.poll(None));
        let (a, b) = (a.unwrap(), b.unwrap());

        // exactly one of the two batches carries the task
        assert_eq!(a.len() + b.len(), 1);
    }
}
