use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2,
    RefinementParameters, Triangulation,
};
use tracing::warn;

use crate::error::{KernelError, Result};
use crate::grid::{FaceId, Grid, VertexId};
use crate::math::{Point3, REMOVE_DOUBLES_THRESHOLD};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Upper bound on Steiner points added while refining one cap.
const MAX_REFINEMENT_VERTICES: usize = 4096;

/// Faces of a planar triangulation plus the constraint edges it honours.
pub(super) struct Triangulated {
    pub faces: BTreeSet<FaceId>,
    pub constraints: Vec<[VertexId; 2]>,
}

/// Triangulates the planar region enclosed by `constraints`.
///
/// Nested loops are all kept: everything inside the outermost loop is
/// triangulated, and inner loops survive as constraint edges. With
/// `min_angle_deg`, the triangulation is refined until every triangle meets
/// the angle bound; constraint edges may be split by Steiner points.
pub(super) fn triangulate(
    grid: &mut Grid,
    constraints: &[[VertexId; 2]],
    min_angle_deg: Option<f64>,
) -> Result<Triangulated> {
    if constraints.len() < 3 {
        return Err(KernelError::Triangulation("boundary needs at least 3 edges".into()).into());
    }

    let ids: BTreeSet<VertexId> = constraints.iter().flatten().copied().collect();
    let mut points = Vec::with_capacity(ids.len());
    for &id in &ids {
        points.push((id, grid.vertex(id)?.point));
    }
    let z = points[0].1.z;
    if points.iter().any(|(_, p)| (p.z - z).abs() > REMOVE_DOUBLES_THRESHOLD) {
        return Err(KernelError::Degenerate("boundary is not planar".into()).into());
    }
    for (i, (_, a)) in points.iter().enumerate() {
        if points[i + 1..]
            .iter()
            .any(|(_, b)| (a - b).norm() < REMOVE_DOUBLES_THRESHOLD)
        {
            return Err(KernelError::Degenerate("coincident boundary vertices".into()).into());
        }
    }

    let mut cdt = Cdt::new();
    let mut to_grid: HashMap<FixedVertexHandle, VertexId> = HashMap::new();
    let mut to_cdt: HashMap<VertexId, FixedVertexHandle> = HashMap::new();
    for &(id, p) in &points {
        let handle = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| KernelError::Triangulation(format!("CDT insert: {e}")))?;
        to_grid.insert(handle, id);
        to_cdt.insert(id, handle);
    }

    for [a, b] in constraints {
        let (Some(&from), Some(&to)) = (to_cdt.get(a), to_cdt.get(b)) else {
            continue;
        };
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(KernelError::Triangulation("boundary edges intersect".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    if let Some(angle) = min_angle_deg {
        let params = RefinementParameters::<f64>::new()
            .exclude_outer_faces(true)
            .with_angle_limit(AngleLimit::from_deg(angle))
            .with_max_additional_vertices(MAX_REFINEMENT_VERTICES);
        let result = cdt.refine(params);
        if !result.refinement_complete {
            warn!(angle, "cap refinement stopped at the Steiner point limit");
        }
    }

    for vertex in cdt.vertices() {
        if !to_grid.contains_key(&vertex.fix()) {
            let pos = vertex.position();
            let id = grid.add_vertex(Point3::new(pos.x, pos.y, z), None);
            to_grid.insert(vertex.fix(), id);
        }
    }
    let lookup = |handle: FixedVertexHandle| {
        to_grid
            .get(&handle)
            .copied()
            .ok_or_else(|| KernelError::Triangulation("unmapped triangulation vertex".into()))
    };

    let interior = classify_interior_faces(&cdt);
    let mut faces = BTreeSet::new();
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix()) {
            continue;
        }
        let [a, b, c] = face.vertices();
        let triangle = [lookup(a.fix())?, lookup(b.fix())?, lookup(c.fix())?];
        faces.insert(grid.ensure_face(&triangle, None));
    }
    if faces.is_empty() {
        return Err(KernelError::Triangulation("boundary encloses no area".into()).into());
    }

    let mut kept = Vec::new();
    for edge in cdt.undirected_edges() {
        if cdt.is_constraint_edge(edge.fix()) {
            let [a, b] = edge.vertices();
            kept.push([lookup(a.fix())?, lookup(b.fix())?]);
        }
    }

    Ok(Triangulated {
        faces,
        constraints: kept,
    })
}

/// Finds the inner faces of the CDT enclosed by at least one constraint loop.
///
/// Flood-fills from the faces adjacent to the outer face at depth 0; crossing
/// a constraint edge increments the depth. Any positive depth is interior, so
/// the region inside a nested loop is kept as well.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<FixedFaceHandle<InnerTag>> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<FixedFaceHandle<InnerTag>, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let fix = inner.fix();
            if depth_map.contains_key(&fix) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(fix, depth);
            queue.push_back((fix, depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        if depth > 0 {
            interior.insert(face_fix);
        }
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_fix = neighbor.fix();
            if depth_map.contains_key(&n_fix) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_fix, new_depth);
            queue.push_back((n_fix, new_depth));
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::Dimension;

    fn square(grid: &mut Grid, half: f64, z: f64) -> Vec<[VertexId; 2]> {
        let v: Vec<_> = [(-half, -half), (half, -half), (half, half), (-half, half)]
            .into_iter()
            .map(|(x, y)| grid.add_vertex(Point3::new(x, y, z), None))
            .collect();
        (0..4).map(|i| [v[i], v[(i + 1) % 4]]).collect()
    }

    #[test]
    fn square_gives_two_triangles() {
        let mut grid = Grid::new();
        let constraints = square(&mut grid, 1.0, 0.0);
        let cap = triangulate(&mut grid, &constraints, None).unwrap();
        assert_eq!(cap.faces.len(), 2);
        assert_eq!(cap.constraints.len(), 4);
    }

    #[test]
    fn nested_loop_is_kept_and_respected() {
        let mut grid = Grid::new();
        let mut constraints = square(&mut grid, 2.0, 0.0);
        constraints.extend(square(&mut grid, 0.5, 0.0));
        let cap = triangulate(&mut grid, &constraints, None).unwrap();
        // 8 vertices, convex hull of 4: 2 * 8 - 2 - 4 = 10 triangles
        assert_eq!(cap.faces.len(), 10);
        for [a, b] in &constraints {
            assert!(grid.find_edge(*a, *b).is_some());
        }
    }

    #[test]
    fn refinement_adds_vertices_and_keeps_the_plane() {
        let mut grid = Grid::new();
        let constraints = square(&mut grid, 1.0, 0.75);
        let cap = triangulate(&mut grid, &constraints, Some(30.0)).unwrap();
        assert!(cap.faces.len() >= 2);
        for (_, vertex) in grid.vertices() {
            approx::assert_relative_eq!(vertex.point.z, 0.75);
        }
        assert!(grid.count(Dimension::Face) >= cap.faces.len());
    }

    #[test]
    fn non_planar_boundary_fails() {
        let mut grid = Grid::new();
        let a = grid.add_vertex(Point3::new(0.0, 0.0, 0.0), None);
        let b = grid.add_vertex(Point3::new(1.0, 0.0, 0.0), None);
        let c = grid.add_vertex(Point3::new(0.0, 1.0, 0.5), None);
        let result = triangulate(&mut grid, &[[a, b], [b, c], [c, a]], None);
        assert!(result.is_err());
    }

    #[test]
    fn coincident_vertices_fail() {
        let mut grid = Grid::new();
        let a = grid.add_vertex(Point3::new(0.0, 0.0, 0.0), None);
        let b = grid.add_vertex(Point3::new(1.0, 0.0, 0.0), None);
        let c = grid.add_vertex(Point3::new(0.0, 1.0, 0.0), None);
        let d = grid.add_vertex(Point3::new(1.0, 1e-12, 0.0), None);
        let result = triangulate(&mut grid, &[[a, b], [b, c], [c, a], [a, d]], None);
        assert!(result.is_err());
    }
}
