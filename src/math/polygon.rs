use std::f64::consts::{PI, TAU};

use super::{Point3, Vector3};

/// Regular polygon inscribed in a circle, first vertex on the +x side of the
/// center. This is the cross-section a circle profile actually produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularPolygon {
    /// Only `x` and `y` are used.
    pub center: Point3,
    /// Circumradius.
    pub radius: f64,
    pub sides: usize,
}

impl RegularPolygon {
    #[must_use]
    pub fn new(center: Point3, radius: f64, sides: usize) -> Self {
        Self { center, radius, sides }
    }

    #[allow(clippy::cast_precision_loss)]
    fn sector(&self) -> f64 {
        TAU / self.sides as f64
    }

    /// Distance from the center to every edge.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apothem(&self) -> f64 {
        self.radius * (PI / self.sides as f64).cos()
    }

    /// Outward unit normal of edge `k`, the edge between vertices `k` and `k + 1`.
    #[allow(clippy::cast_precision_loss)]
    fn edge_normal(&self, k: usize) -> Vector3 {
        let angle = (k as f64 + 0.5) * self.sector();
        Vector3::new(angle.cos(), angle.sin(), 0.0)
    }

    /// Vertices in counterclockwise order, at the height of `center`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertices(&self) -> Vec<Point3> {
        (0..self.sides)
            .map(|i| {
                let angle = self.sector() * i as f64;
                Point3::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                    self.center.z,
                )
            })
            .collect()
    }

    /// Tests the XY projection of `point` against the polygon grown by
    /// `slack` on every edge. A negative slack shrinks it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn contains(&self, point: &Point3, slack: f64) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        // The binding edge of a regular polygon is the one of the point's sector.
        let k = (dy.atan2(dx).rem_euclid(TAU) / self.sector()).floor() as usize % self.sides;
        let normal = self.edge_normal(k);
        dx * normal.x + dy * normal.y <= self.apothem() + slack
    }

    /// Distance along the planar `direction` from `from`, an interior point, to
    /// the polygon boundary. `direction` must be a unit vector.
    #[must_use]
    pub fn exit_distance(&self, from: &Point3, direction: &Vector3) -> f64 {
        let offset = Vector3::new(from.x - self.center.x, from.y - self.center.y, 0.0);
        (0..self.sides)
            .filter_map(|k| {
                let normal = self.edge_normal(k);
                let speed = direction.dot(&normal);
                (speed > 0.0).then(|| (self.apothem() - offset.dot(&normal)) / speed)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    // ── Containment ─────────────────────────────────────────

    #[test]
    fn square_excludes_circular_segments() {
        let square = RegularPolygon::new(Point3::origin(), 1.0, 4);
        assert_relative_eq!(square.apothem(), 0.5_f64.sqrt(), epsilon = 1e-12);
        assert!(square.contains(&p(0.99, 0.0, 3.0), 0.0));
        assert!(square.contains(&p(0.35, 0.35, 0.0), 0.0));
        assert!(!square.contains(&p(0.6, 0.6, 0.0), 0.0));
    }

    #[test]
    fn negative_slack_shrinks_polygon() {
        let triangle = RegularPolygon::new(Point3::origin(), 1.0, 3);
        // Left edge of the triangle is the line x = -0.5.
        assert!(triangle.contains(&p(-0.49, 0.0, 0.0), 0.0));
        assert!(!triangle.contains(&p(-0.49, 0.0, 0.0), -0.02));
        assert!(!triangle.contains(&p(-0.6, 0.0, 0.0), 0.0));
    }

    #[test]
    fn vertices_lie_on_circumcircle() {
        let hexagon = RegularPolygon::new(p(1.0, 2.0, 0.5), 0.3, 6);
        let vertices = hexagon.vertices();
        assert_eq!(vertices.len(), 6);
        assert_relative_eq!(vertices[0], p(1.3, 2.0, 0.5), epsilon = 1e-12);
        for v in &vertices {
            assert_relative_eq!(crate::math::planar_distance(v, &hexagon.center), 0.3, epsilon = 1e-12);
            assert!(hexagon.contains(v, 1e-12));
        }
    }

    // ── Ray exit ────────────────────────────────────────────

    #[test]
    fn exit_distance_hits_edge_or_vertex() {
        let triangle = RegularPolygon::new(Point3::origin(), 1.0, 3);
        assert_relative_eq!(triangle.exit_distance(&Point3::origin(), &-Vector3::x()), 0.5, epsilon = 1e-12);
        assert_relative_eq!(triangle.exit_distance(&Point3::origin(), &Vector3::x()), 1.0, epsilon = 1e-12);

        let decagon = RegularPolygon::new(Point3::origin(), 0.2, 10);
        assert_relative_eq!(decagon.exit_distance(&Point3::origin(), &-Vector3::x()), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn exit_distance_from_off_center_point() {
        let square = RegularPolygon::new(Point3::origin(), 1.0, 4);
        // Vertices on the axes; the first-quadrant edge is x + y = 1.
        let from = p(0.2, 0.0, 0.0);
        assert_relative_eq!(square.exit_distance(&from, &Vector3::x()), 0.8, epsilon = 1e-12);
    }
}
