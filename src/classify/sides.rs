use crate::error::Result;
use crate::grid::{Adjacency, Dimension, Element, Grid, Selection, SubsetIndex};
use crate::kernel::close_faces;

/// Recomputes face, edge and vertex subsets from the volumes.
///
/// Faces take the smallest subset of their volumes, edges the smallest of
/// their faces, vertices the smallest of their edges. Anything still
/// unassigned afterwards falls back to [`fill_unassigned_sides`]. Returns the
/// number of fallbacks.
///
/// # Errors
///
/// Fails if the grid is inconsistent.
pub fn recompute_sides(grid: &mut Grid) -> Result<usize> {
    for dimension in [Dimension::Vertex, Dimension::Edge, Dimension::Face] {
        grid.reset_subsets(dimension);
    }
    let adjacency = Adjacency::build(grid)?;

    let faces: Vec<_> = grid
        .faces()
        .map(|(id, _)| (id, min_subset(grid, adjacency.face_volumes(id).iter().map(|&v| Element::Volume(v)))))
        .collect();
    for (face, subset) in faces {
        grid.set_subset(Element::Face(face), subset)?;
    }

    let edges: Vec<_> = grid
        .edges()
        .map(|(id, _)| (id, min_subset(grid, adjacency.edge_faces(id).iter().map(|&f| Element::Face(f)))))
        .collect();
    for (edge, subset) in edges {
        grid.set_subset(Element::Edge(edge), subset)?;
    }

    let vertices: Vec<_> = grid
        .vertices()
        .map(|(id, _)| (id, min_subset(grid, adjacency.vertex_edges(id).iter().map(|&e| Element::Edge(e)))))
        .collect();
    for (vertex, subset) in vertices {
        grid.set_subset(Element::Vertex(vertex), subset)?;
    }

    fill_with(grid, &adjacency)
}

/// Gives every unassigned face, edge and vertex the smallest subset among
/// the volumes it touches. Assigned elements are left alone. Returns how many
/// elements were filled.
///
/// # Errors
///
/// Fails if the grid is inconsistent.
pub fn fill_unassigned_sides(grid: &mut Grid) -> Result<usize> {
    let adjacency = Adjacency::build(grid)?;
    fill_with(grid, &adjacency)
}

fn fill_with(grid: &mut Grid, adjacency: &Adjacency) -> Result<usize> {
    let mut fills = Vec::new();
    for (id, face) in grid.faces() {
        if face.subset.is_none() {
            fills.push((Element::Face(id), adjacency.face_volumes(id)));
        }
    }
    for (id, edge) in grid.edges() {
        if edge.subset.is_none() {
            fills.push((Element::Edge(id), adjacency.edge_volumes(id)));
        }
    }
    for (id, vertex) in grid.vertices() {
        if vertex.subset.is_none() {
            fills.push((Element::Vertex(id), adjacency.vertex_volumes(id)));
        }
    }

    let fills: Vec<_> = fills
        .into_iter()
        .filter_map(|(element, volumes)| {
            min_subset(grid, volumes.iter().map(|&v| Element::Volume(v))).map(|subset| (element, subset))
        })
        .collect();
    for &(element, subset) in &fills {
        grid.set_subset(element, Some(subset))?;
    }
    Ok(fills.len())
}

fn min_subset(grid: &Grid, elements: impl Iterator<Item = Element>) -> Option<SubsetIndex> {
    elements.filter_map(|element| grid.subset(element).ok().flatten()).min()
}

/// Faces separating `inner` volumes from anything else, closed under edges
/// and vertices.
///
/// # Errors
///
/// Fails if the grid is inconsistent.
pub fn depot_shell(grid: &Grid, inner: SubsetIndex) -> Result<Selection> {
    let adjacency = Adjacency::build(grid)?;
    let mut faces = Selection::new();
    for (face, _) in grid.faces() {
        let volumes = adjacency.face_volumes(face);
        let mut touches = false;
        let mut separates = volumes.len() == 1;
        for &volume in volumes {
            if grid.volume(volume)?.subset == Some(inner) {
                touches = true;
            } else {
                separates = true;
            }
        }
        if touches && separates {
            faces.faces.insert(face);
        }
    }
    close_faces(grid, &faces)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::{VolumeId, VolumeKind};
    use crate::math::Point3;

    /// Three tetrahedra fanned around the z axis, subsets 4, 2 and 2.
    fn fan() -> (Grid, [VolumeId; 3]) {
        let mut grid = Grid::new();
        let bottom = grid.add_vertex(Point3::new(0.0, 0.0, 0.0), None);
        let top = grid.add_vertex(Point3::new(0.0, 0.0, 1.0), None);
        let ring: Vec<_> = [(1.0, 0.0), (-0.5, 0.8), (-0.5, -0.8)]
            .into_iter()
            .map(|(x, y)| grid.add_vertex(Point3::new(x, y, 0.5), Some(9)))
            .collect();
        let mut volumes = Vec::new();
        for (i, subset) in [4, 2, 2].into_iter().enumerate() {
            let tet = vec![bottom, top, ring[i], ring[(i + 1) % 3]];
            volumes.push(grid.add_volume(VolumeKind::Tetrahedron, tet, Some(subset)).unwrap());
        }
        (grid, [volumes[0], volumes[1], volumes[2]])
    }

    #[test]
    fn sides_take_smallest_neighbouring_subset() {
        let (mut grid, _) = fan();
        let fallbacks = recompute_sides(&mut grid).unwrap();
        assert_eq!(fallbacks, 0);
        assert!(grid.ensure_fully_assigned().is_ok());
        // The shared axis edge touches all three volumes.
        let axis = grid.edges().find(|(_, e)| {
            let points = grid.points(&e.vertices).unwrap();
            points.iter().all(|p| p.x.abs() < 1e-12 && p.y.abs() < 1e-12)
        });
        assert_eq!(axis.unwrap().1.subset, Some(2));
        assert_eq!(grid.count_in_subset(Dimension::Vertex, Some(9)), 0);
        assert!(grid.count_in_subset(Dimension::Face, Some(4)) > 0);
    }

    #[test]
    fn fill_keeps_existing_labels() {
        let (mut grid, _) = fan();
        let filled = fill_unassigned_sides(&mut grid).unwrap();
        // Only the two axis vertices started unassigned.
        assert_eq!(filled, 2);
        assert_eq!(grid.count_in_subset(Dimension::Vertex, Some(9)), 3);
        assert_eq!(grid.count_in_subset(Dimension::Vertex, Some(2)), 2);
    }

    #[test]
    fn shell_separates_inner_volume() {
        let (grid, _) = fan();
        let shell = depot_shell(&grid, 4).unwrap();
        // Two outer faces, one shared with each neighbour and the ring face.
        assert_eq!(shell.faces.len(), 4);
        assert_eq!(shell.vertices.len(), 4);
        assert!(shell.volumes.is_empty());
    }
}
