use std::time::Duration;

use middleware::{burst::BurstLimiter, global::GlobalLimiter};

pub mod middleware {
    pub mod burst;
    pub mod global;
}

pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}

pub fn burst_middleware(max: u32, window_ms: u64) -> BurstLimiter {
    BurstLimiter::new(max, Duration::from_millis(window_ms))
}
