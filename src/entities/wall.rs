//! Rotating inner walls

use crate::geom::{self, Point, Polygon};

/// Lifecycle phase of a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPhase {
    /// Has not been selected for rotation yet
    Unrotated,
    /// Currently rotating toward its target
    Rotating,
    /// Reached its target rotation
    FinishedRotating,
}

/// A spiked wall with a fixed center and a rotation state machine
#[derive(Debug, Clone)]
pub struct Wall {
    // coordinates of the center point, fixed for the wall's lifetime
    pub x: f64,
    pub y: f64,

    /// Current rotation in degrees, normalized to [0, 360)
    pub rotation: i32,
    /// Rotation the wall is moving toward
    pub target_rotation: i32,
    /// Signed degrees per tick while rotating
    pub rotation_vel: i32,

    pub phase: WallPhase,

    /// Cleared by the arena for ticks where advancing would overlap a player
    /// or projectile
    pub can_rotate: bool,

    /// Rectangle collision body at the current rotation
    pub body: Polygon,
}

impl Wall {
    pub const WIDTH: f64 = 40.0;
    pub const HEIGHT: f64 = 200.0;

    /// Length of the destructive spike extending past each short edge
    pub const SPIKE_HEIGHT: f64 = 35.0;

    /// Initial rotation of every wall in the fixed layout
    pub const INITIAL_ROTATION: i32 = 45;

    pub fn new(x: f64, y: f64) -> Self {
        let rotation = Self::INITIAL_ROTATION;
        Self {
            x,
            y,
            rotation,
            target_rotation: rotation,
            rotation_vel: 0,
            phase: WallPhase::Unrotated,
            can_rotate: true,
            body: Self::body_at(x, y, rotation),
        }
    }

    /// Rebuild the collision rectangle at the current rotation
    pub fn update_body(&mut self) {
        self.body = Self::body_at(self.x, self.y, self.rotation);
    }

    /// The collision rectangle this wall would have at a given rotation
    pub fn body_at(x: f64, y: f64, rotation: i32) -> Polygon {
        Polygon::rect(Point::new(x, y), Self::WIDTH, Self::HEIGHT, rotation)
    }

    /// Endpoints of the wall's long-axis segment, spike tip to spike tip
    ///
    /// Projectiles are classified against this segment: endpoint contact is
    /// destructive, interior contact deflects.
    pub fn segment(&self) -> (Point, Point) {
        self.segment_at(self.rotation)
    }

    /// The long-axis segment at a given rotation
    pub fn segment_at(&self, rotation: i32) -> (Point, Point) {
        let dir = geom::facing(rotation);
        let reach = Self::HEIGHT / 2.0 + Self::SPIKE_HEIGHT;
        (
            Point::new(self.x + dir.x * reach, self.y + dir.y * reach),
            Point::new(self.x - dir.x * reach, self.y - dir.y * reach),
        )
    }

    /// Begin rotating toward a target 90 degrees away
    pub fn start_rotating(&mut self, direction: i32) {
        self.phase = WallPhase::Rotating;
        self.rotation_vel = direction.signum();
        self.target_rotation = geom::normalize_deg(self.rotation + 90 * self.rotation_vel);
    }

    /// Advance rotation by one increment if permitted, finishing at the target
    pub fn advance_rotation(&mut self) {
        if self.phase != WallPhase::Rotating || !self.can_rotate {
            return;
        }

        self.rotation = geom::normalize_deg(self.rotation + self.rotation_vel);
        self.update_body();

        if self.rotation == self.target_rotation {
            self.phase = WallPhase::FinishedRotating;
            self.rotation_vel = 0;
        }
    }
}
