//! Wall lifecycle manager
//!
//! Owns the fixed wall layout and the promotion timer. The arena drives the
//! per-tick blocked-increment check, since only it can see players and
//! projectiles; the manager handles selection and rotation bookkeeping.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::entities::{Wall, WallPhase};
use crate::util::time::secs_to_ticks;

/// Fixed wall centers, two rows of three
const WALL_LAYOUT: [(f64, f64); 6] = [
    (210.0, 500.0),
    (480.0, 500.0),
    (750.0, 500.0),
    (210.0, 140.0),
    (480.0, 140.0),
    (750.0, 140.0),
];

/// Ticks between promoting walls to the rotating phase
const PROMOTION_INTERVAL_TICKS: u64 = secs_to_ticks(2);

/// Owns and advances the wall set for one arena
#[derive(Debug)]
pub struct WallManager {
    pub walls: Vec<Wall>,
    ticks_until_promotion: u64,
}

impl WallManager {
    pub fn new() -> Self {
        Self {
            walls: WALL_LAYOUT.iter().map(|&(x, y)| Wall::new(x, y)).collect(),
            ticks_until_promotion: PROMOTION_INTERVAL_TICKS,
        }
    }

    /// Promote one random unrotated wall when the periodic timer fires
    pub fn tick_promotions(&mut self, rng: &mut ChaCha8Rng) {
        let unrotated: Vec<usize> = self
            .walls
            .iter()
            .enumerate()
            .filter(|(_, w)| w.phase == WallPhase::Unrotated)
            .map(|(i, _)| i)
            .collect();
        if unrotated.is_empty() {
            return;
        }

        if self.ticks_until_promotion > 0 {
            self.ticks_until_promotion -= 1;
            return;
        }
        self.ticks_until_promotion = PROMOTION_INTERVAL_TICKS;

        let idx = unrotated[rng.gen_range(0..unrotated.len())];
        let direction = if rng.gen_bool(0.5) { 1 } else { -1 };
        self.walls[idx].start_rotating(direction);
        debug!(
            wall = idx,
            direction,
            target = self.walls[idx].target_rotation,
            "Wall promoted to rotating"
        );
    }

    /// Advance every rotating wall whose increment was not blocked this tick
    pub fn advance_rotations(&mut self) {
        for wall in &mut self.walls {
            wall.advance_rotation();
        }
    }

    /// Restore the initial layout for the next match
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for WallManager {
    fn default() -> Self {
        Self::new()
    }
}
