//! Engine error taxonomy.
//!
//! 設計原則: どのエラーも内部で握りつぶさず、そのまま呼び出し側へ伝播する。
//! ユーザー向けメッセージへの変換は周辺アプリケーションの責務。
//!
//! Note that "already completed" is *not* here: a duplicate completion is a
//! successful no-op under the idempotency contract, not an error.

use thiserror::Error;

use super::ids::TaskId;
use super::recurrence::RecurrenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The referenced task does not exist. Not retried; surfaced as-is.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Programmer/data error from the recurrence calculator.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// Transient storage failure. The whole `complete` call is safe to
    /// retry because the completion transition is idempotent.
    #[error("lifecycle write was not committed: {0}")]
    PersistenceFailed(String),
}
