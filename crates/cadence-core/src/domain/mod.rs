//! Domain model (ids, task records, recurrence, errors).

pub mod errors;
pub mod ids;
pub mod recurrence;
pub mod task;

pub use self::errors::EngineError;
pub use self::ids::TaskId;
pub use self::recurrence::{Recurrence, RecurrenceError, next_due_date};
pub use self::task::{Priority, TaskDraft, TaskDraftError, TaskRecord};
