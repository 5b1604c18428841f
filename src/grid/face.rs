use super::{SubsetIndex, VertexId};

slotmap::new_key_type! {
    /// Unique identifier for a face in the grid.
    pub struct FaceId;
}

/// A planar polygonal face: a triangle or, before tetrahedralization, a quad.
///
/// Vertices are stored in boundary order.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub vertices: Vec<VertexId>,
    pub subset: Option<SubsetIndex>,
}

impl FaceData {
    #[must_use]
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// Consecutive vertex pairs along the face boundary.
    pub fn boundary_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Order-independent lookup key for the face spanned by `vertices`.
pub(crate) fn face_key(vertices: &[VertexId]) -> Vec<VertexId> {
    let mut key = vertices.to_vec();
    key.sort_unstable();
    key
}
