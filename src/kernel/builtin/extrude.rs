use std::collections::HashMap;

use crate::error::{KernelError, Result};
use crate::grid::{Grid, Selection, SubsetIndex, VertexId, VolumeKind};
use crate::math::{Vector3, TOLERANCE};

/// Sweeps triangles along +z, one layer of prisms per step.
///
/// Vertices lifted within a step are shared, so neighbouring prisms share
/// their side quads. Every new element takes the subset of the face it was
/// swept from. Returns the top faces of the last step.
#[allow(clippy::cast_precision_loss)]
pub(super) fn extrude(grid: &mut Grid, faces: &Selection, offset: f64, steps: usize) -> Result<Selection> {
    if steps == 0 {
        return Err(KernelError::Degenerate("extrusion needs at least one step".into()).into());
    }
    if offset.abs() < TOLERANCE {
        return Err(KernelError::Degenerate(format!("extrusion offset {offset} vanishes")).into());
    }
    if faces.faces.is_empty() {
        return Err(KernelError::EmptySelection("nothing to extrude".into()).into());
    }

    let mut current: Vec<(Vec<VertexId>, Option<SubsetIndex>)> = Vec::with_capacity(faces.faces.len());
    for &face in &faces.faces {
        let data = grid.face(face)?;
        if !data.is_triangle() {
            return Err(KernelError::Degenerate("only triangles can be extruded".into()).into());
        }
        current.push((data.vertices.clone(), data.subset));
    }

    let lift = Vector3::new(0.0, 0.0, offset / steps as f64);
    for _ in 0..steps {
        let mut lifted: HashMap<VertexId, VertexId> = HashMap::new();
        let mut next = Vec::with_capacity(current.len());
        for (bottom, subset) in &current {
            let mut top = Vec::with_capacity(3);
            for &v in bottom {
                let id = if let Some(&id) = lifted.get(&v) {
                    id
                } else {
                    let point = grid.vertex(v)?.point + lift;
                    let id = grid.add_vertex(point, *subset);
                    lifted.insert(v, id);
                    id
                };
                top.push(id);
            }
            let mut prism = bottom.clone();
            prism.extend_from_slice(&top);
            grid.add_volume(VolumeKind::Prism, prism, *subset)?;
            next.push((top, *subset));
        }
        current = next;
    }

    Ok(Selection::from_faces(
        current.iter().filter_map(|(top, _)| grid.find_face(top)),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::{Dimension, FaceId};
    use crate::math::Point3;

    fn two_triangles(grid: &mut Grid) -> Selection {
        let a = grid.add_vertex(Point3::new(0.0, 0.0, 0.0), Some(1));
        let b = grid.add_vertex(Point3::new(1.0, 0.0, 0.0), Some(1));
        let c = grid.add_vertex(Point3::new(1.0, 1.0, 0.0), Some(1));
        let d = grid.add_vertex(Point3::new(0.0, 1.0, 0.0), Some(1));
        let f0: FaceId = grid.ensure_face(&[a, b, c], Some(1));
        let f1 = grid.ensure_face(&[a, c, d], Some(1));
        Selection::from_faces([f0, f1])
    }

    #[test]
    fn steps_share_lifted_vertices() {
        let mut grid = Grid::new();
        let cap = two_triangles(&mut grid);
        let top = extrude(&mut grid, &cap, 0.9, 3).unwrap();
        assert_eq!(top.faces.len(), 2);
        assert_eq!(grid.count(Dimension::Volume), 6);
        assert_eq!(grid.count(Dimension::Vertex), 16);
        for &face in &top.faces {
            for &v in &grid.face(face).unwrap().vertices {
                approx::assert_relative_eq!(grid.vertex(v).unwrap().point.z, 0.9, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn new_elements_inherit_face_subset() {
        let mut grid = Grid::new();
        let cap = two_triangles(&mut grid);
        extrude(&mut grid, &cap, 1.0, 1).unwrap();
        assert_eq!(grid.count_in_subset(Dimension::Volume, Some(1)), 2);
        assert_eq!(grid.count_in_subset(Dimension::Face, None), 0);
        assert_eq!(grid.count_in_subset(Dimension::Edge, None), 0);
    }

    #[test]
    fn invalid_requests_fail() {
        let mut grid = Grid::new();
        let cap = two_triangles(&mut grid);
        assert!(extrude(&mut grid, &cap, 1.0, 0).is_err());
        assert!(extrude(&mut grid, &cap, 0.0, 2).is_err());
        assert!(extrude(&mut grid, &Selection::new(), 1.0, 2).is_err());
        assert_eq!(grid.count(Dimension::Volume), 0);
    }
}
