//! App - アプリケーション層
//!
//! ports を組み合わせてエンジンの 2 つのエントリポイントを実装します。
//!
//! # 主要コンポーネント
//! - **LifecycleCoordinator**: 完了遷移（complete → 次インスタンスの spawn）
//! - **ReminderDispatcher**: 期限到来リマインダーの claim（select-and-mark）
//! - **ReminderPoller**: 定期トリガー（tick → poll → sink へ配送）

pub mod lifecycle;
pub mod poller;
pub mod reminder;

pub use self::lifecycle::{Completion, LifecycleCoordinator};
pub use self::poller::{DEFAULT_POLL_PERIOD, ReminderPoller};
pub use self::reminder::ReminderDispatcher;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recurrence, TaskDraft, TaskId, TaskRecord};
    use crate::impls::InMemoryTaskStore;
    use crate::ports::{Clock, FixedClock, TaskStore, UlidGenerator};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Arc;
    use ulid::Ulid;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    /// Full lifecycle of a daily standup across one poll window and one
    /// completion: remind once, stay quiet, then spawn a fresh occurrence
    /// that is independently eligible the next day.
    #[tokio::test]
    async fn standup_lifecycle_end_to_end() {
        let monday_0900 = at(2026, 3, 2, 9, 0); // Monday
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = FixedClock::new(at(2026, 3, 2, 8, 0));
        let dispatcher = ReminderDispatcher::new(store.clone(), Arc::new(clock.clone()));
        let coordinator = LifecycleCoordinator::new(
            store.clone(),
            Arc::new(clock.clone()),
            Arc::new(UlidGenerator::new(clock.clone())),
        );

        let draft = TaskDraft {
            title: "standup".into(),
            due_at: Some(monday_0900),
            reminder_offset_minutes: Some(15),
            recurrence: Recurrence::Daily,
            ..TaskDraft::default()
        };
        let record = TaskRecord::create(TaskId::from_ulid(Ulid::new()), draft, clock.now()).unwrap();
        let id = record.id;
        store.create_task(record).await.unwrap();

        // Mon 08:45: threshold reached, reminder claimed and marked
        clock.set(at(2026, 3, 2, 8, 45));
        let batch = dispatcher.poll(None).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, id);
        assert_eq!(batch[0].last_notified_at, Some(at(2026, 3, 2, 8, 45)));

        // Mon 08:50: same occurrence, already marked
        clock.set(at(2026, 3, 2, 8, 50));
        assert!(dispatcher.poll(None).await.unwrap().is_empty());

        // Mon 09:05: complete; next occurrence is Tue 09:05, not Tue 09:00
        clock.set(at(2026, 3, 2, 9, 5));
        let outcome = coordinator.complete(id).await.unwrap();
        let spawned = outcome.spawned.expect("daily task must spawn");
        assert_eq!(spawned.due_at, Some(at(2026, 3, 3, 9, 5)));
        assert!(spawned.last_notified_at.is_none());

        // Tue 08:50: the spawned occurrence is independently eligible
        clock.set(at(2026, 3, 3, 8, 50));
        let batch = dispatcher.poll(None).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, spawned.id);
    }
}
