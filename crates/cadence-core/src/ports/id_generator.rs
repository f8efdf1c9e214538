//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために trait として抽象化しています。
//! 本番用は ULID ベースの [`UlidGenerator`]。

use crate::domain::TaskId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator produces fresh task identifiers.
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// ULID-based generator.
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// テスト時に [`crate::ports::FixedClock`] を渡せば timestamp 部分が
/// 決定的になります（ランダム部分は残ります）。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let timestamp_ms = self.clock.now().and_utc().timestamp_millis() as u64;
        TaskId::from_ulid(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
