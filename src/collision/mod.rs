//! Collision engine - pure geometry tests shared by the whole simulation
//!
//! Every function here is stateless: identical inputs return identical
//! outputs, so different arena tasks can call in concurrently without
//! coordination.

use crate::geom::{Point, Polygon, Vect};

/// Where a segment-vs-circle test made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentHit {
    /// No contact
    Miss,
    /// Closest point lies strictly inside the segment
    Interior,
    /// Closest point is one of the segment's endpoints
    Endpoint,
}

/// Collision tests between the simulation's geometric shapes
pub struct Collisions;

impl Collisions {
    /// Check for overlap between two convex polygons (separating-axis test)
    ///
    /// Projects both polygons onto the outward normal of every edge of either
    /// polygon; a gap on any axis means no collision.
    pub fn polygon_collision(a: &Polygon, b: &Polygon) -> bool {
        for polygon in [a, b] {
            for i1 in 0..polygon.points.len() {
                let i2 = (i1 + 1) % polygon.points.len();

                let p1 = polygon.points[i1];
                let p2 = polygon.points[i2];

                // normal to the edge
                let normal = Vect::new(p2.y - p1.y, p1.x - p2.x);

                let (min_a, max_a) = Self::project(a, normal);
                let (min_b, max_b) = Self::project(b, normal);

                // a separating axis was found
                if max_a < min_b || max_b < min_a {
                    return false;
                }
            }
        }

        // no separating axis exists, the polygons overlap
        true
    }

    /// Check for overlap between a circle and a rotated rectangle
    ///
    /// Rotates the circle center into the rectangle's local frame, clamps it
    /// to the half-extents, and compares the closest-point distance to the
    /// circle radius.
    pub fn circle_rect_collision(center: Point, radius: f64, rect: &Polygon) -> bool {
        let theta = (rect.rotation_deg as f64).to_radians();
        let dx = center.x - rect.center.x;
        let dy = center.y - rect.center.y;

        // the circle center after the whole frame is un-rotated about the
        // rectangle center (inverse of the clockwise body rotation)
        let local = Point::new(
            theta.cos() * dx + theta.sin() * dy + rect.center.x,
            -theta.sin() * dx + theta.cos() * dy + rect.center.y,
        );

        let min_x = rect.center.x - rect.width / 2.0;
        let min_y = rect.center.y - rect.height / 2.0;

        let closest_x = local.x.clamp(min_x, min_x + rect.width);
        let closest_y = local.y.clamp(min_y, min_y + rect.height);

        Self::distance(closest_x, closest_y, local.x, local.y) < radius
    }

    /// Classify contact between a segment and a circle
    ///
    /// The closest point on the segment is found by projecting the circle
    /// center onto the segment's line and clamping the parameter to [0, 1].
    /// Contact at a clamped parameter is an [`SegmentHit::Endpoint`] hit,
    /// otherwise [`SegmentHit::Interior`].
    pub fn segment_circle_hit(p1: Point, p2: Point, center: Point, radius: f64) -> SegmentHit {
        let d = Vect::new(p2.x - p1.x, p2.y - p1.y);
        let to_center = Vect::new(center.x - p1.x, center.y - p1.y);

        let len_sq = d.dot(d);
        let t = if len_sq == 0.0 {
            0.0
        } else {
            to_center.dot(d) / len_sq
        };
        let clamped = t.clamp(0.0, 1.0);

        let closest = Point::new(p1.x + d.x * clamped, p1.y + d.y * clamped);
        if Self::distance(closest.x, closest.y, center.x, center.y) > radius {
            return SegmentHit::Miss;
        }

        if t <= 0.0 || t >= 1.0 {
            SegmentHit::Endpoint
        } else {
            SegmentHit::Interior
        }
    }

    /// Reflect a velocity off a wall with the given direction vector
    ///
    /// Decomposes the velocity into components parallel and normal to the
    /// wall and inverts the normal component: u = (v.n)n, w = v - u,
    /// v' = w - u.
    pub fn reflect(velocity: Vect, wall_dir: Vect) -> Vect {
        let n = Vect::new(wall_dir.y, -wall_dir.x).normalized();
        let vn = velocity.dot(n);
        let u = Vect::new(n.x * vn, n.y * vn);
        let w = Vect::new(velocity.x - u.x, velocity.y - u.y);
        Vect::new(w.x - u.x, w.y - u.y)
    }

    /// Euclidean distance between two coordinate pairs
    pub fn distance(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
        let dx = from_x - to_x;
        let dy = from_y - to_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Project every corner of a polygon onto an axis, returning the interval
    fn project(polygon: &Polygon, axis: Vect) -> (f64, f64) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for p in &polygon.points {
            let projection = axis.x * p.x + axis.y * p.y;
            min = min.min(projection);
            max = max.max(projection);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Polygon;

    fn square(cx: f64, cy: f64, side: f64, rot: i32) -> Polygon {
        Polygon::rect(Point::new(cx, cy), side, side, rot)
    }

    #[test]
    fn disjoint_polygons_do_not_collide() {
        let a = square(0.0, 0.0, 10.0, 0);
        let b = square(100.0, 100.0, 10.0, 0);
        assert!(!Collisions::polygon_collision(&a, &b));
    }

    #[test]
    fn overlapping_polygons_collide() {
        let a = square(0.0, 0.0, 10.0, 0);
        let b = square(4.0, 4.0, 10.0, 30);
        assert!(Collisions::polygon_collision(&a, &b));
    }

    #[test]
    fn full_rotation_preserves_overlap_result() {
        let fixed = square(0.0, 0.0, 10.0, 0);
        let near = square(8.0, 0.0, 10.0, 0);
        let near_rotated = square(8.0, 0.0, 10.0, 360);
        assert_eq!(
            Collisions::polygon_collision(&fixed, &near),
            Collisions::polygon_collision(&fixed, &near_rotated),
        );

        let far = square(50.0, 0.0, 10.0, 15);
        let far_rotated = square(50.0, 0.0, 10.0, 15 + 360);
        assert_eq!(
            Collisions::polygon_collision(&fixed, &far),
            Collisions::polygon_collision(&fixed, &far_rotated),
        );
    }

    #[test]
    fn circle_rect_overlap_is_translation_invariant() {
        let rect = Polygon::rect(Point::new(50.0, 50.0), 40.0, 200.0, 30);
        let center = Point::new(80.0, 40.0);
        let hit = Collisions::circle_rect_collision(center, 15.0, &rect);

        let offset = Vect::new(-312.0, 47.5);
        let moved_rect = Polygon::rect(
            Point::new(50.0 + offset.x, 50.0 + offset.y),
            40.0,
            200.0,
            30,
        );
        let moved_center = Point::new(center.x + offset.x, center.y + offset.y);
        assert_eq!(
            hit,
            Collisions::circle_rect_collision(moved_center, 15.0, &moved_rect),
        );
    }

    #[test]
    fn circle_inside_rotated_rect_collides() {
        let rect = Polygon::rect(Point::new(0.0, 0.0), 40.0, 200.0, 45);
        assert!(Collisions::circle_rect_collision(
            Point::new(0.0, 0.0),
            5.0,
            &rect
        ));
    }

    #[test]
    fn circle_rect_respects_the_rotated_axes() {
        // tall rectangle leaning 45 degrees: long axis along (k, -k)
        let k = std::f64::consts::FRAC_1_SQRT_2;
        let rect = Polygon::rect(Point::new(0.0, 0.0), 40.0, 200.0, 45);

        // near the far end of the long axis, well inside
        assert!(Collisions::circle_rect_collision(
            Point::new(95.0 * k, -95.0 * k),
            10.0,
            &rect
        ));

        // same distance along the short axis is far outside the 20 px
        // half-width
        assert!(!Collisions::circle_rect_collision(
            Point::new(35.0 * k, 35.0 * k),
            10.0,
            &rect
        ));
    }

    #[test]
    fn circle_far_from_rect_misses() {
        let rect = Polygon::rect(Point::new(0.0, 0.0), 40.0, 200.0, 45);
        assert!(!Collisions::circle_rect_collision(
            Point::new(400.0, 0.0),
            5.0,
            &rect
        ));
    }

    #[test]
    fn circle_on_segment_midpoint_is_interior_hit() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(100.0, 0.0);
        let hit = Collisions::segment_circle_hit(p1, p2, Point::new(50.0, 3.0), 5.0);
        assert_eq!(hit, SegmentHit::Interior);
    }

    #[test]
    fn circle_on_segment_endpoint_is_endpoint_hit() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(100.0, 0.0);
        let hit = Collisions::segment_circle_hit(p1, p2, p2, 5.0);
        assert_eq!(hit, SegmentHit::Endpoint);

        let hit = Collisions::segment_circle_hit(p1, p2, Point::new(-2.0, 0.0), 5.0);
        assert_eq!(hit, SegmentHit::Endpoint);
    }

    #[test]
    fn circle_away_from_segment_misses() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(100.0, 0.0);
        let hit = Collisions::segment_circle_hit(p1, p2, Point::new(50.0, 40.0), 5.0);
        assert_eq!(hit, SegmentHit::Miss);
    }

    #[test]
    fn double_reflection_restores_velocity() {
        let v = Vect::new(3.0, -7.5);
        let wall = Vect::new(1.0, 2.0);
        let reflected = Collisions::reflect(v, wall);
        let restored = Collisions::reflect(reflected, wall);
        assert!((restored.x - v.x).abs() < 1e-9);
        assert!((restored.y - v.y).abs() < 1e-9);
    }

    #[test]
    fn reflection_preserves_parallel_component() {
        // wall along x: parallel (x) component kept, normal (y) inverted
        let v = Vect::new(4.0, 2.0);
        let reflected = Collisions::reflect(v, Vect::new(1.0, 0.0));
        assert!((reflected.x - 4.0).abs() < 1e-9);
        assert!((reflected.y + 2.0).abs() < 1e-9);
    }
}
