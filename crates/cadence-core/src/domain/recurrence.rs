//! Recurrence patterns and the next-occurrence calculator.
//!
//! The calculator is a pure function over civil time: no I/O, no state,
//! no timezone conversion. All instants are wall-clock values in the
//! engine's single fixed zone.

use chrono::{Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Recurrence pattern of a task.
///
/// These four intervals (plus `None`) are the whole vocabulary; there is
/// deliberately no generalized "every N units" form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Does completing a task with this pattern spawn a next instance?
    pub fn is_recurring(self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    /// The pattern has no next occurrence. Tasks with `Recurrence::None`
    /// must never reach the calculator; this is a programmer/data error,
    /// so it fails loudly instead of guessing.
    #[error("recurrence pattern `{0}` cannot produce a next occurrence")]
    InvalidPattern(Recurrence),

    /// chrono の表現範囲を超えた（実運用では到達しない）
    #[error("next occurrence is outside the supported calendar range")]
    OutOfRange,
}

/// Compute the next occurrence after `reference` for `pattern`.
///
/// Wall-clock time (hour/minute/second) is always preserved. Month and
/// year steps clamp the day-of-month *backward* to the last valid day of
/// the target month, never forward into the following month:
/// Jan 31 + monthly = Feb 28 (Feb 29 in a leap year), and
/// Feb 29 + yearly = Feb 28 when the target year is not a leap year.
pub fn next_due_date(
    reference: NaiveDateTime,
    pattern: Recurrence,
) -> Result<NaiveDateTime, RecurrenceError> {
    let next = match pattern {
        Recurrence::None => return Err(RecurrenceError::InvalidPattern(pattern)),
        Recurrence::Daily => reference.checked_add_days(Days::new(1)),
        Recurrence::Weekly => reference.checked_add_days(Days::new(7)),
        // chrono's month arithmetic clamps exactly the way we need.
        Recurrence::Monthly => reference.checked_add_months(Months::new(1)),
        Recurrence::Yearly => reference.checked_add_months(Months::new(12)),
    };
    next.ok_or(RecurrenceError::OutOfRange)
}
