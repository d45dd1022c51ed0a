//! Time utilities for game simulation

use std::time::Duration;

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 40; // 25 ms frame period
pub const TICK_DURATION_MS: u64 = 1_000 / SIMULATION_TPS as u64;

/// Duration of a single simulation tick
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_DURATION_MS)
}

/// Convert a duration in seconds of match time to whole ticks
pub const fn secs_to_ticks(secs: u64) -> u64 {
    secs * SIMULATION_TPS as u64
}
