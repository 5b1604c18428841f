use super::{SubsetIndex, VertexId};

slotmap::new_key_type! {
    /// Unique identifier for a volume element in the grid.
    pub struct VolumeId;
}

const TETRAHEDRON_FACES: &[&[usize]] = &[&[0, 1, 2], &[0, 1, 3], &[1, 2, 3], &[0, 2, 3]];
const TETRAHEDRON_EDGES: &[[usize; 2]] = &[[0, 1], [1, 2], [0, 2], [0, 3], [1, 3], [2, 3]];

// Bottom triangle 0-1-2, top triangle 3-4-5, vertex i + 3 sits above vertex i.
const PRISM_FACES: &[&[usize]] = &[&[0, 1, 2], &[3, 4, 5], &[0, 1, 4, 3], &[1, 2, 5, 4], &[2, 0, 3, 5]];
const PRISM_EDGES: &[[usize; 2]] = &[
    [0, 1],
    [1, 2],
    [2, 0],
    [3, 4],
    [4, 5],
    [5, 3],
    [0, 3],
    [1, 4],
    [2, 5],
];

/// Shape of a volume element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeKind {
    Tetrahedron,
    /// Triangular prism produced by extrusion.
    Prism,
}

impl VolumeKind {
    #[must_use]
    pub fn vertex_count(self) -> usize {
        match self {
            Self::Tetrahedron => 4,
            Self::Prism => 6,
        }
    }

    /// Local vertex indices of each face.
    #[must_use]
    pub fn local_faces(self) -> &'static [&'static [usize]] {
        match self {
            Self::Tetrahedron => TETRAHEDRON_FACES,
            Self::Prism => PRISM_FACES,
        }
    }

    /// Local vertex indices of each edge.
    #[must_use]
    pub fn local_edges(self) -> &'static [[usize; 2]] {
        match self {
            Self::Tetrahedron => TETRAHEDRON_EDGES,
            Self::Prism => PRISM_EDGES,
        }
    }
}

/// A volume element.
#[derive(Debug, Clone)]
pub struct VolumeData {
    pub kind: VolumeKind,
    pub vertices: Vec<VertexId>,
    pub subset: Option<SubsetIndex>,
}

impl VolumeData {
    /// Global vertex ids of local face `i`.
    #[must_use]
    pub fn face_vertices(&self, i: usize) -> Vec<VertexId> {
        self.kind.local_faces()[i].iter().map(|&l| self.vertices[l]).collect()
    }

    /// Global vertex ids of every face.
    #[must_use]
    pub fn all_face_vertices(&self) -> Vec<Vec<VertexId>> {
        (0..self.kind.local_faces().len()).map(|i| self.face_vertices(i)).collect()
    }
}
