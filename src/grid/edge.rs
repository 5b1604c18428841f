use super::{SubsetIndex, VertexId};

slotmap::new_key_type! {
    /// Unique identifier for an edge in the grid.
    pub struct EdgeId;
}

/// A straight edge between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub vertices: [VertexId; 2],
    pub subset: Option<SubsetIndex>,
}

/// Order-independent lookup key for the edge between `a` and `b`.
pub(crate) fn edge_key(a: VertexId, b: VertexId) -> [VertexId; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}
