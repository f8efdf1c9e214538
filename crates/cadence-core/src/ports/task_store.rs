//! TaskStore port - タスクレコードの正本（source of truth）
//!
//! # 設計原則
//! - 完了フラグの CAS と次インスタンスの作成は同一コミット内
//! - リマインダーの select と mark-notified も同一クリティカルセクション内
//! - すべての状態はストアから再構築可能（エンジン側に共有可変状態を持たない）
//!
//! 本番実装は行ロック/条件付き UPDATE を持つ SQL ストアを想定し、別クレート
//! に置きます。このクレートにはテスト・開発用の
//! [`crate::impls::InMemoryTaskStore`] のみを含めます。

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::{TaskId, TaskRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Transient backend failure (connection, timeout, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result of a conditional completion write.
#[derive(Debug, Clone)]
pub enum CompletionWrite {
    /// The CAS matched: the record is now completed (and the spawn, if any,
    /// was inserted in the same commit).
    Applied { completed: TaskRecord },

    /// The record was already completed. Some earlier (or concurrent) call
    /// won the race. The stored record is returned unchanged.
    AlreadyCompleted { existing: TaskRecord },
}

/// Storage interface consumed by the lifecycle coordinator and the
/// reminder dispatcher.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_task(&self, id: TaskId) -> Result<TaskRecord, StoreError>;

    async fn create_task(&self, record: TaskRecord) -> Result<(), StoreError>;

    /// Compare-and-swap completion: if the stored record's `completed` flag
    /// equals `expected_completed`, mark it completed at `completed_at` and
    /// insert `spawn` in the same commit; otherwise report
    /// [`CompletionWrite::AlreadyCompleted`].
    ///
    /// The check-then-act is the completion critical section: a conforming
    /// implementation must not let two concurrent calls both observe
    /// `completed == expected_completed`.
    async fn conditional_complete(
        &self,
        id: TaskId,
        expected_completed: bool,
        completed_at: NaiveDateTime,
        spawn: Option<TaskRecord>,
    ) -> Result<CompletionWrite, StoreError>;

    /// Select every record whose reminder threshold has elapsed and whose
    /// `last_notified_at` is clear, stamp `last_notified_at = now`, and
    /// return the batch, all in one critical section, so a concurrent
    /// claim cannot select the same due occurrence.
    async fn claim_due_reminders(&self, now: NaiveDateTime)
    -> Result<Vec<TaskRecord>, StoreError>;
}
