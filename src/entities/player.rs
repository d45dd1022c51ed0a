//! Player state and movement bookkeeping

use std::fmt;

use uuid::Uuid;

use crate::geom::{self, Point, Polygon};
use crate::protocol::ControlInput;

/// The fixed color palette, assigned in join order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Blue,
    Green,
    Red,
    Orange,
}

impl PlayerColor {
    /// Palette in assignment order
    pub const PALETTE: [PlayerColor; 4] = [
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Red,
        PlayerColor::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerColor::Blue => "blue",
            PlayerColor::Green => "green",
            PlayerColor::Red => "red",
            PlayerColor::Orange => "orange",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player in a match (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub color: PlayerColor,

    // position of the center of the rectangle
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees, clockwise from up, normalized to [0, 360)
    pub rotation: i32,

    /// Forward velocity in pixels per tick
    pub vel: f64,
    /// Rotational velocity in degrees per substep
    pub rotation_vel: i32,

    /// Fire key held this tick
    pub shoot_intent: bool,
    /// Latch ensuring one projectile per discrete fire press
    pub ready_to_shoot: bool,

    pub alive: bool,
    pub disconnected: bool,

    /// Collision body at the candidate position/rotation
    pub body: Polygon,

    // candidate values used during substepped collision checking
    pub new_x: f64,
    pub new_y: f64,
    pub new_rotation: i32,
}

impl Player {
    /// Side lengths of the collision rectangle
    pub const WIDTH: f64 = 100.0;
    pub const HEIGHT: f64 = 100.0;

    /// Pixels moved per tick at full throttle; also the substep count
    pub const SPEED: f64 = 5.0;
    /// Degrees turned per substep at full turn input
    pub const TURN_RATE: i32 = 1;

    pub fn new(id: Uuid, color: PlayerColor) -> Self {
        let mut player = Self {
            id,
            color,
            x: 0.0,
            y: 0.0,
            rotation: 0,
            vel: 0.0,
            rotation_vel: 0,
            shoot_intent: false,
            ready_to_shoot: true,
            alive: true,
            disconnected: false,
            body: Polygon::rect(Point::new(0.0, 0.0), Self::WIDTH, Self::HEIGHT, 0),
            new_x: 0.0,
            new_y: 0.0,
            new_rotation: 0,
        };
        player.reset_temp_vars();
        player.update_body();
        player
    }

    /// Apply the latest control message
    ///
    /// The client sends -1 for the up key, so the throttle is sign-inverted
    /// to make a positive forward velocity move toward the facing direction.
    pub fn apply_control(&mut self, input: &ControlInput) {
        self.rotation_vel = input.turn * Self::TURN_RATE;
        self.vel = -f64::from(input.throttle) * Self::SPEED;
        self.shoot_intent = input.fire;
        if !input.fire {
            self.ready_to_shoot = true;
        }
    }

    /// Reset the candidate values to the committed position and rotation
    pub fn reset_temp_vars(&mut self) {
        self.new_x = self.x;
        self.new_y = self.y;
        self.new_rotation = self.rotation;
    }

    /// Recompute the collision rectangle at the candidate position/rotation
    pub fn update_body(&mut self) {
        self.body = Polygon::rect(
            Point::new(self.new_x, self.new_y),
            Self::WIDTH,
            Self::HEIGHT,
            self.new_rotation,
        );
    }

    /// Commit the candidate position and rotation
    pub fn commit_move(&mut self) {
        self.x = self.new_x;
        self.y = self.new_y;
        self.rotation = geom::normalize_deg(self.new_rotation);
        self.new_rotation = self.rotation;
    }
}
