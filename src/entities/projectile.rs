//! Projectile state

use crate::entities::player::{Player, PlayerColor};
use crate::geom::{self, Vect};

/// A projectile in flight
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    // the coordinates of the center point
    pub x: f64,
    pub y: f64,

    /// Unit velocity; the projectile advances by this once per substep
    pub vel: Vect,

    /// The player that fired it, identified by color
    pub color: PlayerColor,

    /// Ticks the projectile has been alive
    pub age: u32,
    /// Ticks since the last wall deflection
    pub ticks_since_deflection: u32,
}

impl Projectile {
    /// Collision radius in pixels
    pub const RADIUS: f64 = 10.0;

    /// Pixels traveled per tick; also the substep count
    pub const SPEED: u32 = 10;

    /// Ticks during which a projectile cannot strike its own shooter
    pub const SELF_IMMUNITY_TICKS: u32 = 2;

    /// Spawn a projectile at the edge of the shooter's body, along its facing
    pub fn new(shooter: &Player) -> Self {
        let dir = geom::facing(shooter.rotation);
        let offset = Player::HEIGHT / 2.0;

        Self {
            x: shooter.x + offset * dir.x,
            y: shooter.y + offset * dir.y,
            vel: dir,
            color: shooter.color,
            age: 0,
            ticks_since_deflection: 0,
        }
    }
}
