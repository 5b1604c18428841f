use std::f64::consts::TAU;

use crate::error::{KernelError, Result};
use crate::grid::{Element, Grid, Selection, SubsetIndex};
use crate::math::{Point3, TOLERANCE};

/// Builds a regular polygon inscribed in the circle of `radius` around
/// `center`, counter-clockwise seen from +z.
#[allow(clippy::cast_precision_loss)]
pub(super) fn make_circle(
    grid: &mut Grid,
    center: Point3,
    radius: f64,
    vertex_count: usize,
    subset: SubsetIndex,
) -> Result<Selection> {
    if vertex_count < 3 {
        return Err(KernelError::Degenerate(format!(
            "circle needs at least 3 vertices, got {vertex_count}"
        ))
        .into());
    }
    if radius < TOLERANCE {
        return Err(KernelError::Degenerate("circle radius must be positive".into()).into());
    }

    let vertices: Vec<_> = (0..vertex_count)
        .map(|i| {
            let angle = TAU * i as f64 / vertex_count as f64;
            let point = Point3::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
                center.z,
            );
            grid.add_vertex(point, Some(subset))
        })
        .collect();

    let mut profile = Selection::new();
    for i in 0..vertex_count {
        let edge = grid.ensure_edge(vertices[i], vertices[(i + 1) % vertex_count], Some(subset));
        profile.insert(Element::Edge(edge));
        profile.insert(Element::Vertex(vertices[i]));
    }
    Ok(profile)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::planar_distance;

    #[test]
    fn polygon_lies_on_circle() {
        let mut grid = Grid::new();
        let center = Point3::new(0.5, -0.25, 2.0);
        let profile = make_circle(&mut grid, center, 0.5, 12, 3).unwrap();
        assert_eq!(profile.vertices.len(), 12);
        assert_eq!(profile.edges.len(), 12);
        for &v in &profile.vertices {
            let vertex = grid.vertex(v).unwrap();
            approx::assert_relative_eq!(planar_distance(&vertex.point, &center), 0.5, epsilon = 1e-12);
            approx::assert_relative_eq!(vertex.point.z, 2.0);
            assert_eq!(vertex.subset, Some(3));
        }
    }

    #[test]
    fn too_few_vertices_fail() {
        let mut grid = Grid::new();
        assert!(make_circle(&mut grid, Point3::origin(), 1.0, 2, 0).is_err());
        assert_eq!(grid.count(crate::grid::Dimension::Vertex), 0);
    }

    #[test]
    fn zero_radius_fails() {
        let mut grid = Grid::new();
        assert!(make_circle(&mut grid, Point3::origin(), 0.0, 8, 0).is_err());
    }
}
