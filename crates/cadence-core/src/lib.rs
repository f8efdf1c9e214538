//! cadence-core
//!
//! Temporal task lifecycle engine: recurrence arithmetic, the
//! complete-and-spawn transition, and at-most-once reminder dispatch.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, recurrence, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, Clock, IdGenerator, ReminderSink）
//! - **app**: アプリケーションロジック（LifecycleCoordinator,
//!   ReminderDispatcher, ReminderPoller）
//! - **impls**: 実装（InMemoryTaskStore など開発用）
//!
//! # 設計原則
//! - 共有可変状態はストアの背後にのみ置く（エンジン自体はステートレス）
//! - 完了遷移の check-then-act と reminder の select-and-mark は
//!   ストア側のクリティカルセクションで保護する
//! - 時刻は単一の固定タイムゾーンの壁時計時刻（`NaiveDateTime`）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use self::app::{Completion, LifecycleCoordinator, ReminderDispatcher, ReminderPoller};
pub use self::domain::{
    EngineError, Priority, Recurrence, RecurrenceError, TaskDraft, TaskId, TaskRecord,
    next_due_date,
};
pub use self::impls::InMemoryTaskStore;
pub use self::ports::{
    Clock, CompletionWrite, FixedClock, IdGenerator, ReminderSink, StoreError, SystemClock,
    TaskStore, UlidGenerator,
};
