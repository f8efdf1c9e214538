//! Clock port - 時刻の抽象化
//!
//! エンジン内の時刻はすべて単一の固定タイムゾーン（UTC+8、DST なし）の
//! 壁時計時刻です。`NaiveDateTime` を使うことで「エンジンはタイムゾーン
//! 変換をしない」という契約を型レベルで保証します。

use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};

/// Fixed civil offset of the engine's zone, in hours east of UTC.
const CIVIL_OFFSET_HOURS: i64 = 8;

/// Clock は現在の壁時計時刻を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - テストでは [`FixedClock`] を使用
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock: UTC now shifted onto the fixed civil offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        (Utc::now() + Duration::hours(CIVIL_OFFSET_HOURS)).naive_utc()
    }
}

/// Deterministic clock for tests: set or advance it explicitly.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().expect("clock mutex poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock mutex poisoned")
    }
}
