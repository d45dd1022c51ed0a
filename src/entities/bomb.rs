//! Area-denial bombs
//!
//! A bomb sits in warning mode for a few seconds, then detonates and grows
//! outward, eliminating any player it touches. It is removed unconditionally
//! once its total lifetime expires.

use crate::util::time::secs_to_ticks;

/// Lifecycle phase of a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombPhase {
    /// Visible countdown, not yet dangerous
    Warning,
    /// Armed and growing
    Detonated,
}

/// A bomb at a fixed ring position
#[derive(Debug, Clone)]
pub struct Bomb {
    // position of the center, fixed once spawned
    pub x: f64,
    pub y: f64,

    /// Current radius; grows once detonated
    pub radius: f64,

    pub phase: BombPhase,

    /// Ticks since the bomb was spawned
    pub age: u64,
}

impl Bomb {
    pub const INITIAL_RADIUS: f64 = 10.0;
    /// Radius growth per tick after detonation
    pub const RADIUS_STEP: f64 = 0.4;
    pub const FINAL_RADIUS: f64 = 40.0;

    /// Ticks spent in warning mode before detonating
    pub const WARNING_TICKS: u64 = secs_to_ticks(3);
    /// Total lifetime in ticks before unconditional removal
    pub const LIFETIME_TICKS: u64 = secs_to_ticks(10);

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: Self::INITIAL_RADIUS,
            phase: BombPhase::Warning,
            age: 0,
        }
    }

    /// Advance one tick; returns false once the bomb should be removed
    pub fn update(&mut self) -> bool {
        self.age += 1;

        match self.phase {
            BombPhase::Warning => {
                if self.age > Self::WARNING_TICKS {
                    self.phase = BombPhase::Detonated;
                }
            }
            BombPhase::Detonated => {
                if self.radius < Self::FINAL_RADIUS {
                    self.radius = (self.radius + Self::RADIUS_STEP).min(Self::FINAL_RADIUS);
                }
            }
        }

        self.age <= Self::LIFETIME_TICKS
    }

    /// True once the bomb collides with players
    pub fn is_armed(&self) -> bool {
        self.phase == BombPhase::Detonated
    }
}
