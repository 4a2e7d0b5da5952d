//! Clock source used by the engine: a monotonic tick for priority
//! ordering, paired with a wall-clock anchor for display formatting.
//!
//! Priority never depends on a clock that can jump backwards — the tick
//! counter is derived from `Instant`, which `std` guarantees is
//! monotonic. The wall-clock side is only ever read to produce a human
//! readable timestamp; it is never compared for ordering purposes.

use chrono::{DateTime, Local};
use std::time::{Instant, SystemTime};

use crate::types::Timestamp;

pub struct EngineClock {
    instant_epoch: Instant,
    wall_epoch: SystemTime,
}

impl EngineClock {
    pub fn new() -> Self {
        Self {
            instant_epoch: Instant::now(),
            wall_epoch: SystemTime::now(),
        }
    }

    /// Captures the current instant as a `(monotonic tick, wall time)`
    /// pair. Call exactly once per engine operation, under the lock.
    pub fn now(&self) -> (Timestamp, DateTime<Local>) {
        let elapsed = self.instant_epoch.elapsed();
        let wall = self.wall_epoch + elapsed;
        (Timestamp(elapsed.as_nanos() as u64), DateTime::<Local>::from(wall))
    }
}

impl Default for EngineClock {
    fn default() -> Self {
        Self::new()
    }
}
