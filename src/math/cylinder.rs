use super::{planar_distance, Point3, RegularPolygon, REMOVE_DOUBLES_THRESHOLD, SELECTION_THRESHOLD};

/// A segment of a vertical axis, used to bound selections along the stack.
///
/// The interval is half-open: `z_low` belongs to the segment, `z_high` belongs
/// to whatever sits above it. The topmost segment of a stack is closed so that
/// elements on the top plane are not starved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSegment {
    /// Point on the axis; only `x` and `y` are used.
    pub center: Point3,
    /// Lower bound along z.
    pub z_low: f64,
    /// Upper bound along z.
    pub z_high: f64,
    /// Whether `z_high` itself belongs to the segment.
    pub closed_top: bool,
    /// Downward shift of both bounds. Must stay below a quarter of the
    /// thinnest extrusion step, or element centroids cross into the next
    /// segment.
    pub slack: f64,
}

impl AxisSegment {
    /// Creates a half-open axis segment.
    #[must_use]
    pub fn new(center: Point3, z_low: f64, z_high: f64) -> Self {
        Self {
            center,
            z_low,
            z_high,
            closed_top: false,
            slack: SELECTION_THRESHOLD,
        }
    }

    /// Replaces the boundary slack.
    #[must_use]
    pub fn with_slack(mut self, slack: f64) -> Self {
        self.slack = slack;
        self
    }

    /// Marks the upper bound as inclusive.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed_top = true;
        self
    }

    /// Axial extent of the segment.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.z_high - self.z_low
    }

    /// Height halfway between both bounds.
    #[must_use]
    pub fn mid_height(&self) -> f64 {
        0.5 * (self.z_low + self.z_high)
    }

    /// Tests whether `z` falls into the segment.
    ///
    /// Both bounds are shifted down by `slack` so a point lying exactly on a
    /// shared boundary plane is claimed by the upper segment only.
    #[must_use]
    pub fn contains_height(&self, z: f64) -> bool {
        let low = self.z_low - self.slack;
        if self.closed_top {
            z >= low && z <= self.z_high + self.slack
        } else {
            z >= low && z < self.z_high - self.slack
        }
    }
}

/// A finite upright cylinder: an axis segment plus a radius.
///
/// A faceted cylinder stands for the regular polygon with `facets` vertices
/// inscribed in the circle, first vertex on the +x side of the axis. That is
/// the cross-section a circle profile actually produces, and the only exact
/// way to tell elements inside the polygon from those between chord and arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderRegion {
    pub axis: AxisSegment,
    pub radius: f64,
    pub facets: Option<usize>,
}

impl CylinderRegion {
    #[must_use]
    pub fn new(axis: AxisSegment, radius: f64) -> Self {
        Self {
            axis,
            radius,
            facets: None,
        }
    }

    /// Restricts the radial test to the inscribed regular polygon.
    #[must_use]
    pub fn with_facets(mut self, facets: usize) -> Self {
        self.facets = (facets >= 3).then_some(facets);
        self
    }

    /// Tests whether `point` lies inside the cylinder, radial slack included.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        self.axis.contains_height(point.z) && self.contains_planar(point)
    }

    fn contains_planar(&self, point: &Point3) -> bool {
        match self.facets {
            Some(sides) => RegularPolygon::new(self.axis.center, self.radius, sides)
                .contains(point, REMOVE_DOUBLES_THRESHOLD),
            None => planar_distance(point, &self.axis.center) <= self.radius + SELECTION_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn shared_boundary_belongs_to_upper_segment() {
        let lower = AxisSegment::new(Point3::origin(), 0.0, 1.0);
        let upper = AxisSegment::new(Point3::origin(), 1.0, 2.0);
        assert!(!lower.contains_height(1.0));
        assert!(upper.contains_height(1.0));
        assert!(lower.contains_height(0.0));
    }

    #[test]
    fn narrow_slack_keeps_thin_step_centroids() {
        // Two slabs of 4e-3 with steps of 1e-3: the last tetrahedra of the
        // lower slab have centroids a quarter step below the shared plane.
        let lower = AxisSegment::new(Point3::origin(), 0.0, 0.004);
        let upper = AxisSegment::new(Point3::origin(), 0.004, 0.008);
        let z = 0.004 - 0.00025;
        assert!(!lower.contains_height(z));
        assert!(upper.contains_height(z));

        let lower = lower.with_slack(0.000_125);
        let upper = upper.with_slack(0.000_125);
        assert!(lower.contains_height(z));
        assert!(!upper.contains_height(z));
        assert!(!lower.contains_height(0.004));
        assert!(upper.contains_height(0.004));
    }

    #[test]
    fn closed_segment_keeps_top_plane() {
        let top = AxisSegment::new(Point3::origin(), 1.0, 2.0).closed();
        assert!(top.contains_height(2.0));
        assert!(!top.contains_height(2.1));
    }

    #[test]
    fn cylinder_checks_radius_around_offset_axis() {
        let axis = AxisSegment::new(p(1.0, 1.0, 0.0), 0.0, 1.0);
        let cylinder = CylinderRegion::new(axis, 0.5);
        assert!(cylinder.contains(&p(1.4, 1.0, 0.5)));
        assert!(cylinder.contains(&p(1.5, 1.0, 0.5)));
        assert!(!cylinder.contains(&p(0.0, 0.0, 0.5)));
        assert!(!cylinder.contains(&p(1.0, 1.0, 1.5)));
    }

    #[test]
    fn faceted_cylinder_excludes_circular_segments() {
        let axis = AxisSegment::new(Point3::origin(), 0.0, 1.0);
        let square = CylinderRegion::new(axis, 1.0).with_facets(4);
        // Vertices at (1, 0), (0, 1), ...; the edge midpoint sits at 0.707.
        assert!(square.contains(&p(0.99, 0.0, 0.5)));
        assert!(square.contains(&p(0.35, 0.35, 0.5)));
        assert!(!square.contains(&p(0.6, 0.6, 0.5)));
        assert!(CylinderRegion::new(axis, 1.0).contains(&p(0.6, 0.6, 0.5)));
    }

    #[test]
    fn segment_height_and_mid() {
        let axis = AxisSegment::new(Point3::origin(), 0.8, 1.1);
        approx::assert_relative_eq!(axis.height(), 0.3, epsilon = 1e-12);
        approx::assert_relative_eq!(axis.mid_height(), 0.95, epsilon = 1e-12);
    }
}
