use crate::math::Point3;

use super::SubsetIndex;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the grid.
    pub struct VertexId;
}

/// A mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Owning subset, `None` while unassigned.
    pub subset: Option<SubsetIndex>,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point3, subset: Option<SubsetIndex>) -> Self {
        Self { point, subset }
    }
}
