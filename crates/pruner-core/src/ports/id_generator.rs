//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::{PassId, PrunerId};
use crate::ports::Clock;
use ulid::Ulid;

/// # Thread Safety
/// - `Send + Sync` を要求（スケジューラのタスクからも使う）
pub trait IdGenerator: Send + Sync {
    fn generate_pruner_id(&self) -> PrunerId;

    fn generate_pass_id(&self) -> PassId;
}

/// ULID ベースの ID 生成器
///
/// Clock を使うので、FixedClock で timestamp 部分を固定できます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_pruner_id(&self) -> PrunerId {
        PrunerId::from(self.next_ulid())
    }

    fn generate_pass_id(&self) -> PassId {
        PassId::from(self.next_ulid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let a = id_gen.generate_pass_id();
        let b = id_gen.generate_pass_id();
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_clock_pins_the_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let pruner = id_gen.generate_pruner_id();
        let pass = id_gen.generate_pass_id();

        assert_eq!(pruner.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert_eq!(pass.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert!(pruner.to_string().starts_with("pruner-"));
        assert!(pass.to_string().starts_with("pass-"));
    }
}
