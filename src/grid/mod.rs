mod adjacency;
mod edge;
mod face;
mod selection;
mod vertex;
mod volume;

pub use adjacency::Adjacency;
pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use selection::Selection;
pub use vertex::{VertexData, VertexId};
pub use volume::{VolumeData, VolumeId, VolumeKind};

use std::collections::{HashMap, HashSet};
use std::fmt;

use slotmap::SlotMap;

use crate::error::GridError;
use crate::math::{centroid, Point3};

use edge::edge_key;
use face::face_key;

/// Position of a subset in the subset numbering.
pub type SubsetIndex = usize;

/// Topological dimension of a grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Vertex,
    Edge,
    Face,
    Volume,
}

impl Dimension {
    /// All dimensions, lowest first.
    pub const ALL: [Dimension; 4] = [Self::Vertex, Self::Edge, Self::Face, Self::Volume];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// A handle to any grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
    Volume(VolumeId),
}

impl Element {
    #[must_use]
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Vertex(_) => Dimension::Vertex,
            Self::Edge(_) => Dimension::Edge,
            Self::Face(_) => Dimension::Face,
            Self::Volume(_) => Dimension::Volume,
        }
    }
}

/// Central arena that owns every element of the volume mesh.
///
/// Edges and faces are unique per vertex set: asking for an edge or face that
/// already exists returns the existing one, so neighbouring volumes share
/// their sides.
#[derive(Debug, Default, Clone)]
pub struct Grid {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    volumes: SlotMap<VolumeId, VolumeData>,
    edge_index: HashMap<[VertexId; 2], EdgeId>,
    face_index: HashMap<Vec<VertexId>, FaceId>,
}

impl Grid {
    /// Creates a new, empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3, subset: Option<SubsetIndex>) -> VertexId {
        self.vertices.insert(VertexData::new(point, subset))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the grid.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, GridError> {
        self.vertices
            .get(id)
            .ok_or(GridError::EntityNotFound("vertex"))
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Positions of the given vertices, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any vertex is missing.
    pub fn points(&self, ids: &[VertexId]) -> Result<Vec<Point3>, GridError> {
        ids.iter().map(|&id| self.vertex(id).map(|v| v.point)).collect()
    }

    // --- Edge operations ---

    /// Returns the edge between `a` and `b`, if any.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    /// Returns the edge between `a` and `b`, creating it with `subset` if needed.
    pub fn ensure_edge(&mut self, a: VertexId, b: VertexId, subset: Option<SubsetIndex>) -> EdgeId {
        if let Some(id) = self.find_edge(a, b) {
            return id;
        }
        let id = self.edges.insert(EdgeData { vertices: [a, b], subset });
        self.edge_index.insert(edge_key(a, b), id);
        id
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the grid.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, GridError> {
        self.edges.get(id).ok_or(GridError::EntityNotFound("edge"))
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Removes an edge; faces still using it are not touched.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<EdgeData> {
        let data = self.edges.remove(id)?;
        self.edge_index.remove(&edge_key(data.vertices[0], data.vertices[1]));
        Some(data)
    }

    /// Removes every edge that no face uses. Returns how many were removed.
    pub fn remove_orphan_edges(&mut self) -> usize {
        let used: HashSet<EdgeId> = self
            .faces
            .values()
            .flat_map(|face| face.boundary_pairs().collect::<Vec<_>>())
            .filter_map(|(a, b)| self.find_edge(a, b))
            .collect();
        let orphans: Vec<EdgeId> = self.edges.keys().filter(|id| !used.contains(id)).collect();
        for &id in &orphans {
            self.remove_edge(id);
        }
        orphans.len()
    }

    // --- Face operations ---

    /// Returns the face spanned by exactly these vertices, if any.
    #[must_use]
    pub fn find_face(&self, vertices: &[VertexId]) -> Option<FaceId> {
        self.face_index.get(&face_key(vertices)).copied()
    }

    /// Returns the face spanned by `vertices`, creating it and its boundary
    /// edges with `subset` if needed.
    pub fn ensure_face(&mut self, vertices: &[VertexId], subset: Option<SubsetIndex>) -> FaceId {
        if let Some(id) = self.find_face(vertices) {
            return id;
        }
        let n = vertices.len();
        for i in 0..n {
            self.ensure_edge(vertices[i], vertices[(i + 1) % n], subset);
        }
        let id = self.faces.insert(FaceData {
            vertices: vertices.to_vec(),
            subset,
        });
        self.face_index.insert(face_key(vertices), id);
        id
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the grid.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, GridError> {
        self.faces.get(id).ok_or(GridError::EntityNotFound("face"))
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Removes a face; its edges stay in the grid.
    pub fn remove_face(&mut self, id: FaceId) -> Option<FaceData> {
        let data = self.faces.remove(id)?;
        self.face_index.remove(&face_key(&data.vertices));
        Some(data)
    }

    /// Boundary edges of a face, in boundary order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its edges is missing.
    pub fn face_edges(&self, id: FaceId) -> Result<Vec<EdgeId>, GridError> {
        self.face(id)?
            .boundary_pairs()
            .map(|(a, b)| self.find_edge(a, b).ok_or(GridError::EntityNotFound("edge")))
            .collect()
    }

    // --- Volume operations ---

    /// Inserts a volume, creating its faces and edges with `subset` where
    /// they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex count does not match `kind` or a vertex
    /// is missing.
    pub fn add_volume(
        &mut self,
        kind: VolumeKind,
        vertices: Vec<VertexId>,
        subset: Option<SubsetIndex>,
    ) -> Result<VolumeId, GridError> {
        if vertices.len() != kind.vertex_count() {
            return Err(GridError::WrongVertexCount {
                expected: kind.vertex_count(),
                found: vertices.len(),
            });
        }
        for &v in &vertices {
            self.vertex(v)?;
        }
        let data = VolumeData { kind, vertices, subset };
        for face in data.all_face_vertices() {
            self.ensure_face(&face, subset);
        }
        Ok(self.volumes.insert(data))
    }

    /// Returns a reference to the volume data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the grid.
    pub fn volume(&self, id: VolumeId) -> Result<&VolumeData, GridError> {
        self.volumes.get(id).ok_or(GridError::EntityNotFound("volume"))
    }

    /// Iterates over all volumes.
    pub fn volumes(&self) -> impl Iterator<Item = (VolumeId, &VolumeData)> {
        self.volumes.iter()
    }

    /// Removes a volume; its faces and edges stay in the grid.
    pub fn remove_volume(&mut self, id: VolumeId) -> Option<VolumeData> {
        self.volumes.remove(id)
    }

    /// Faces of a volume, in local face order.
    ///
    /// # Errors
    ///
    /// Returns an error if the volume or one of its faces is missing.
    pub fn volume_faces(&self, id: VolumeId) -> Result<Vec<FaceId>, GridError> {
        self.volume(id)?
            .all_face_vertices()
            .iter()
            .map(|face| self.find_face(face).ok_or(GridError::EntityNotFound("face")))
            .collect()
    }

    // --- Element-generic operations ---

    /// Number of elements of one dimension.
    #[must_use]
    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Vertex => self.vertices.len(),
            Dimension::Edge => self.edges.len(),
            Dimension::Face => self.faces.len(),
            Dimension::Volume => self.volumes.len(),
        }
    }

    /// All elements of one dimension, in arena order.
    #[must_use]
    pub fn elements(&self, dimension: Dimension) -> Vec<Element> {
        match dimension {
            Dimension::Vertex => self.vertices.keys().map(Element::Vertex).collect(),
            Dimension::Edge => self.edges.keys().map(Element::Edge).collect(),
            Dimension::Face => self.faces.keys().map(Element::Face).collect(),
            Dimension::Volume => self.volumes.keys().map(Element::Volume).collect(),
        }
    }

    /// Vertices spanning an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing.
    pub fn element_vertices(&self, element: Element) -> Result<Vec<VertexId>, GridError> {
        Ok(match element {
            Element::Vertex(id) => {
                self.vertex(id)?;
                vec![id]
            }
            Element::Edge(id) => self.edge(id)?.vertices.to_vec(),
            Element::Face(id) => self.face(id)?.vertices.clone(),
            Element::Volume(id) => self.volume(id)?.vertices.clone(),
        })
    }

    /// Representative point of an element: the mean of its vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or one of its vertices is missing.
    pub fn centroid(&self, element: Element) -> Result<Point3, GridError> {
        let points = self.points(&self.element_vertices(element)?)?;
        Ok(centroid(&points))
    }

    /// Subset of an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing.
    pub fn subset(&self, element: Element) -> Result<Option<SubsetIndex>, GridError> {
        Ok(match element {
            Element::Vertex(id) => self.vertex(id)?.subset,
            Element::Edge(id) => self.edge(id)?.subset,
            Element::Face(id) => self.face(id)?.subset,
            Element::Volume(id) => self.volume(id)?.subset,
        })
    }

    /// Assigns an element to a subset, or clears it with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing.
    pub fn set_subset(&mut self, element: Element, subset: Option<SubsetIndex>) -> Result<(), GridError> {
        let slot = match element {
            Element::Vertex(id) => self.vertices.get_mut(id).map(|v| &mut v.subset),
            Element::Edge(id) => self.edges.get_mut(id).map(|e| &mut e.subset),
            Element::Face(id) => self.faces.get_mut(id).map(|f| &mut f.subset),
            Element::Volume(id) => self.volumes.get_mut(id).map(|v| &mut v.subset),
        };
        let slot = slot.ok_or(GridError::EntityNotFound("element"))?;
        *slot = subset;
        Ok(())
    }

    /// Clears the subset of every element of one dimension.
    pub fn reset_subsets(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Vertex => self.vertices.values_mut().for_each(|v| v.subset = None),
            Dimension::Edge => self.edges.values_mut().for_each(|e| e.subset = None),
            Dimension::Face => self.faces.values_mut().for_each(|f| f.subset = None),
            Dimension::Volume => self.volumes.values_mut().for_each(|v| v.subset = None),
        }
    }

    /// Rewrites every assigned subset index through `map`.
    pub fn remap_subsets(&mut self, map: impl Fn(SubsetIndex) -> Option<SubsetIndex>) {
        let remap = |slot: &mut Option<SubsetIndex>| *slot = slot.and_then(&map);
        self.vertices.values_mut().for_each(|v| remap(&mut v.subset));
        self.edges.values_mut().for_each(|e| remap(&mut e.subset));
        self.faces.values_mut().for_each(|f| remap(&mut f.subset));
        self.volumes.values_mut().for_each(|v| remap(&mut v.subset));
    }

    /// Number of elements of one dimension in `subset` (`None` counts the
    /// unassigned ones).
    #[must_use]
    pub fn count_in_subset(&self, dimension: Dimension, subset: Option<SubsetIndex>) -> usize {
        match dimension {
            Dimension::Vertex => self.vertices.values().filter(|v| v.subset == subset).count(),
            Dimension::Edge => self.edges.values().filter(|e| e.subset == subset).count(),
            Dimension::Face => self.faces.values().filter(|f| f.subset == subset).count(),
            Dimension::Volume => self.volumes.values().filter(|v| v.subset == subset).count(),
        }
    }

    /// Checks that no element is left without a subset.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Unassigned`] for the lowest dimension with
    /// unassigned elements.
    pub fn ensure_fully_assigned(&self) -> Result<(), GridError> {
        for dimension in Dimension::ALL {
            let count = self.count_in_subset(dimension, None);
            if count > 0 {
                return Err(GridError::Unassigned { dimension, count });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_prism(grid: &mut Grid) -> VolumeId {
        let v: Vec<_> = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 1.0, 1.0),
        ]
        .into_iter()
        .map(|q| grid.add_vertex(q, None))
        .collect();
        grid.add_volume(VolumeKind::Prism, v, Some(0)).unwrap()
    }

    #[test]
    fn prism_creates_faces_and_edges() {
        let mut grid = Grid::new();
        let prism = unit_prism(&mut grid);
        assert_eq!(grid.count(Dimension::Vertex), 6);
        assert_eq!(grid.count(Dimension::Edge), 9);
        assert_eq!(grid.count(Dimension::Face), 5);
        assert_eq!(grid.volume_faces(prism).unwrap().len(), 5);
        assert_eq!(grid.count_in_subset(Dimension::Face, Some(0)), 5);
    }

    #[test]
    fn faces_are_shared_between_volumes() {
        let mut grid = Grid::new();
        let a = grid.add_vertex(p(0.0, 0.0, 0.0), None);
        let b = grid.add_vertex(p(1.0, 0.0, 0.0), None);
        let c = grid.add_vertex(p(0.0, 1.0, 0.0), None);
        let top = grid.add_vertex(p(0.0, 0.0, 1.0), None);
        let bottom = grid.add_vertex(p(0.0, 0.0, -1.0), None);
        grid.add_volume(VolumeKind::Tetrahedron, vec![a, b, c, top], None).unwrap();
        grid.add_volume(VolumeKind::Tetrahedron, vec![c, b, a, bottom], None).unwrap();
        assert_eq!(grid.count(Dimension::Face), 7);
        assert_eq!(grid.count(Dimension::Edge), 9);
    }

    #[test]
    fn wrong_vertex_count_is_rejected() {
        let mut grid = Grid::new();
        let a = grid.add_vertex(p(0.0, 0.0, 0.0), None);
        let result = grid.add_volume(VolumeKind::Tetrahedron, vec![a, a, a], None);
        assert!(matches!(result, Err(GridError::WrongVertexCount { expected: 4, found: 3 })));
    }

    #[test]
    fn centroid_of_prism() {
        let mut grid = Grid::new();
        let prism = unit_prism(&mut grid);
        let c = grid.centroid(Element::Volume(prism)).unwrap();
        approx::assert_relative_eq!(c, p(1.0 / 3.0, 1.0 / 3.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn remap_and_reset_subsets() {
        let mut grid = Grid::new();
        unit_prism(&mut grid);
        grid.remap_subsets(|s| Some(s + 3));
        assert_eq!(grid.count_in_subset(Dimension::Edge, Some(3)), 9);
        grid.reset_subsets(Dimension::Edge);
        assert_eq!(grid.count_in_subset(Dimension::Edge, None), 9);
        assert!(matches!(
            grid.ensure_fully_assigned(),
            Err(GridError::Unassigned { dimension: Dimension::Vertex, count: 6 })
        ));
    }

    #[test]
    fn orphan_edges_are_removed() {
        let mut grid = Grid::new();
        let a = grid.add_vertex(p(0.0, 0.0, 0.0), None);
        let b = grid.add_vertex(p(1.0, 0.0, 0.0), None);
        let c = grid.add_vertex(p(0.0, 1.0, 0.0), None);
        let d = grid.add_vertex(p(1.0, 1.0, 0.0), None);
        grid.ensure_face(&[a, b, c], None);
        grid.ensure_edge(b, d, None);
        assert_eq!(grid.remove_orphan_edges(), 1);
        assert!(grid.find_edge(b, d).is_none());
        assert_eq!(grid.count(Dimension::Edge), 3);
    }
}
