//! Bomb lifecycle manager
//!
//! Spawns bombs on a periodic timer at randomized ring positions and advances
//! their warning/detonation/expiry phases. Player elimination on contact is
//! the arena's job during movement checks.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::entities::Bomb;
use crate::util::time::secs_to_ticks;

/// Ticks between bomb spawns
const SPAWN_INTERVAL_TICKS: u64 = secs_to_ticks(3);

// inner sampling rectangle
const SAMPLE_MIN_X: i32 = 140;
const SAMPLE_MAX_X: i32 = 820;
const SAMPLE_MIN_Y: i32 = 70;
const SAMPLE_MAX_Y: i32 = 570;

// the outer ring the sampled point is snapped to
const RING_LEFT: i32 = 90;
const RING_RIGHT: i32 = 870;
const RING_TOP: i32 = 70;
const RING_BOTTOM: i32 = 570;

/// Owns and advances the bomb set for one arena
#[derive(Debug)]
pub struct BombManager {
    pub bombs: Vec<Bomb>,
    ticks_until_spawn: u64,
}

impl BombManager {
    pub fn new() -> Self {
        Self {
            bombs: Vec::new(),
            ticks_until_spawn: SPAWN_INTERVAL_TICKS,
        }
    }

    /// Advance every bomb one tick, dropping expired ones, then possibly spawn
    pub fn tick(&mut self, rng: &mut ChaCha8Rng) {
        self.bombs.retain_mut(|bomb| bomb.update());

        if self.ticks_until_spawn > 0 {
            self.ticks_until_spawn -= 1;
            return;
        }
        self.ticks_until_spawn = SPAWN_INTERVAL_TICKS;

        let (x, y) = Self::ring_position(rng);
        debug!(x, y, "Bomb spawned");
        self.bombs.push(Bomb::new(f64::from(x), f64::from(y)));
    }

    /// Sample a point in the inner rectangle and snap it outward to the ring
    ///
    /// Whichever axis needs the smaller displacement to reach the ring is the
    /// one adjusted, so the result always lies exactly on one ring edge.
    fn ring_position(rng: &mut ChaCha8Rng) -> (i32, i32) {
        let mut x = rng.gen_range(SAMPLE_MIN_X..SAMPLE_MAX_X);
        let mut y = rng.gen_range(SAMPLE_MIN_Y..SAMPLE_MAX_Y);

        let dx = (x - RING_LEFT).abs().min((x - RING_RIGHT).abs());
        let dy = (y - RING_TOP).abs().min((y - RING_BOTTOM).abs());

        if dx < dy {
            if x > (RING_LEFT + RING_RIGHT) / 2 {
                x += dx;
            } else {
                x -= dx;
            }
        } else if y > (RING_TOP + RING_BOTTOM) / 2 {
            y += dy;
        } else {
            y -= dy;
        }

        (x, y)
    }

    /// Clear all bombs and re-arm the spawn timer for the next match
    pub fn reset(&mut self) {
        self.bombs.clear();
        self.ticks_until_spawn = SPAWN_INTERVAL_TICKS;
    }
}

impl Default for BombManager {
    fn default() -> Self {
        Self::new()
    }
}
