use std::collections::BTreeSet;

use super::{Dimension, EdgeId, Element, FaceId, VertexId, VolumeId};

/// A set of grid elements, grouped by dimension.
///
/// Ordered sets keep iteration deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub vertices: BTreeSet<VertexId>,
    pub edges: BTreeSet<EdgeId>,
    pub faces: BTreeSet<FaceId>,
    pub volumes: BTreeSet<VolumeId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding exactly the given faces.
    pub fn from_faces(faces: impl IntoIterator<Item = FaceId>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Adds one element.
    pub fn insert(&mut self, element: Element) {
        match element {
            Element::Vertex(id) => {
                self.vertices.insert(id);
            }
            Element::Edge(id) => {
                self.edges.insert(id);
            }
            Element::Face(id) => {
                self.faces.insert(id);
            }
            Element::Volume(id) => {
                self.volumes.insert(id);
            }
        }
    }

    /// Adds every element of `other`.
    pub fn extend(&mut self, other: &Selection) {
        self.vertices.extend(other.vertices.iter().copied());
        self.edges.extend(other.edges.iter().copied());
        self.faces.extend(other.faces.iter().copied());
        self.volumes.extend(other.volumes.iter().copied());
    }

    /// Number of selected elements of one dimension.
    #[must_use]
    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Vertex => self.vertices.len(),
            Dimension::Edge => self.edges.len(),
            Dimension::Face => self.faces.len(),
            Dimension::Volume => self.volumes.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        Dimension::ALL.iter().map(|&d| self.count(d)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all selected elements, vertices first.
    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        self.vertices
            .iter()
            .map(|&id| Element::Vertex(id))
            .chain(self.edges.iter().map(|&id| Element::Edge(id)))
            .chain(self.faces.iter().map(|&id| Element::Face(id)))
            .chain(self.volumes.iter().map(|&id| Element::Volume(id)))
    }
}
