//! ReminderSink port - 通知配送の抽象化
//!
//! 実際の配送（プッシュ通知など）は外部コラボレーターの責務。
//! エンジンは claim 済みバッチを渡すだけで、配送はロックの外で行われます。
//! 件数の上限（1 回のポーリングで 5 件まで等）もシンク側のポリシー。

use async_trait::async_trait;

use crate::domain::TaskRecord;

/// Receives each claimed reminder batch, strictly after the store's
/// critical section has released.
///
/// A delivery failure does not un-claim the batch: the `last_notified_at`
/// mark is the at-most-once synchronization point and is never rolled back
/// by this engine.
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn deliver(&self, batch: Vec<TaskRecord>) -> Result<(), String>;
}
