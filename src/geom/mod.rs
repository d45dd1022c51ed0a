//! Geometry primitives - points, vectors, and collision polygons
//!
//! Pure value types. Rotation is measured in integer degrees, clockwise from
//! "up", with the screen y axis growing downward. The facing unit vector for
//! a rotation of theta degrees is therefore (sin theta, -cos theta).

/// A point in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vect {
    pub x: f64,
    pub y: f64,
}

impl Vect {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vect) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. Zero vectors are returned unchanged.
    pub fn normalized(self) -> Vect {
        let len = self.length();
        if len == 0.0 {
            return self;
        }
        Vect::new(self.x / len, self.y / len)
    }
}

/// The facing unit vector for a clockwise-from-up rotation in degrees
pub fn facing(rotation_deg: i32) -> Vect {
    let theta = (rotation_deg as f64).to_radians();
    Vect::new(theta.sin(), -theta.cos())
}

/// Normalize a rotation in degrees to [0, 360)
pub fn normalize_deg(rotation: i32) -> i32 {
    rotation.rem_euclid(360)
}

/// A convex polygon used for collision detection
///
/// Corners are stored in order. The center/rotation/extent fields carry the
/// rectangle description that the circle-vs-rectangle test needs; they are
/// only meaningful for polygons built with [`Polygon::rect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub center: Point,
    pub rotation_deg: i32,
    pub width: f64,
    pub height: f64,
}

impl Polygon {
    /// Build a rotated rectangle from its center, extents, and rotation
    pub fn rect(center: Point, width: f64, height: f64, rotation_deg: i32) -> Self {
        // unit vector along the rectangle's long (facing) axis, and its
        // perpendicular, per the original corner construction
        let v1 = facing(rotation_deg);
        let v2 = Vect::new(v1.y, -v1.x);

        let hx = v1.x * height / 2.0;
        let hy = v1.y * height / 2.0;
        let wx = v2.x * width / 2.0;
        let wy = v2.y * width / 2.0;

        let points = vec![
            Point::new(center.x + hx + wx, center.y + hy + wy),
            Point::new(center.x - hx + wx, center.y - hy + wy),
            Point::new(center.x - hx - wx, center.y - hy - wy),
            Point::new(center.x + hx - wx, center.y + hy - wy),
        ];

        Self {
            points,
            center,
            rotation_deg,
            width,
            height,
        }
    }

}
