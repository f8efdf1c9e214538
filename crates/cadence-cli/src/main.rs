use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;

use cadence_core::{
    Clock, FixedClock, IdGenerator, InMemoryTaskStore, LifecycleCoordinator, Priority, Recurrence,
    ReminderDispatcher, ReminderPoller, ReminderSink, TaskDraft, TaskId, TaskRecord, TaskStore,
    UlidGenerator,
};

/// Demo sink: prints each claimed batch instead of pushing notifications.
struct StdoutSink;

#[async_trait]
impl ReminderSink for StdoutSink {
    async fn deliver(&self, batch: Vec<TaskRecord>) -> Result<(), String> {
        for task in batch {
            println!(
                "reminder: {} ({}) due {:?}",
                task.title, task.id, task.due_at
            );
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    // (A) ストアと時計を用意（デモなので FixedClock を手で進める）
    let store = Arc::new(InMemoryTaskStore::new());
    let clock = FixedClock::new(
        chrono::NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    );
    let ids = Arc::new(UlidGenerator::new(clock.clone()));

    let coordinator = LifecycleCoordinator::new(store.clone(), Arc::new(clock.clone()), ids.clone());
    let dispatcher = ReminderDispatcher::new(store.clone(), Arc::new(clock.clone()));

    // (B) ポーラーを起動（デモ用に短い周期）
    let poller = ReminderPoller::spawn(
        dispatcher.clone(),
        Arc::new(StdoutSink),
        Duration::from_millis(200),
    );

    // (C) 毎日 09:00 のスタンドアップを作成（リマインダーは 15 分前）
    let draft = TaskDraft {
        title: "standup".into(),
        due_at: clock
            .now()
            .checked_add_signed(ChronoDuration::hours(1)),
        priority: Priority::High,
        tags: vec!["work".into()],
        reminder_offset_minutes: Some(15),
        recurrence: Recurrence::Daily,
    };
    let record = TaskRecord::create(ids.generate_task_id(), draft, clock.now()).unwrap();
    let id: TaskId = record.id;
    store.create_task(record).await.unwrap();
    println!("created task: {id}");

    // (D) 閾値を越えるまで時計を進め、ポーラーに 1 回だけ拾わせる
    clock.advance(ChronoDuration::minutes(50)); // 08:50 >= 09:00 - 15min
    tokio::time::sleep(Duration::from_millis(500)).await;

    // (E) 完了 → 次インスタンスが spawn される（完了時刻基準）
    clock.advance(ChronoDuration::minutes(20)); // 09:10
    let outcome = coordinator.complete(id).await.unwrap();
    match &outcome.spawned {
        Some(next) => println!(
            "completed {id}; next occurrence {} due {:?}",
            next.id, next.due_at
        ),
        None => println!("completed {id}; nothing spawned"),
    }

    // (F) 重複完了は冪等な no-op
    let retry = coordinator.complete(id).await.unwrap();
    println!("duplicate complete spawned: {}", retry.spawned.is_some());

    poller.shutdown_and_join().await;
}
