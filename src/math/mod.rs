pub mod cylinder;
pub mod polygon;

pub use cylinder::{AxisSegment, CylinderRegion};
pub use polygon::RegularPolygon;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Slack applied at axial window boundaries shared by two regions.
pub const SELECTION_THRESHOLD: f64 = 1e-3;

/// Distance below which two profile vertices count as coincident.
pub const REMOVE_DOUBLES_THRESHOLD: f64 = 1e-8;

/// Distance between the projections of `a` and `b` onto the XY plane.
#[must_use]
pub fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Arithmetic mean of a set of points.
///
/// Returns the origin for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}
