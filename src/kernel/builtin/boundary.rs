use crate::error::Result;
use crate::grid::{Adjacency, Grid, Selection};
use crate::kernel::close_faces;

/// Faces bounding exactly one volume, closed under edges and vertices.
pub(super) fn extract(grid: &Grid) -> Result<Selection> {
    let adjacency = Adjacency::build(grid)?;
    let faces = Selection::from_faces(
        grid.faces()
            .map(|(id, _)| id)
            .filter(|&id| adjacency.face_volumes(id).len() == 1),
    );
    close_faces(grid, &faces)
}
