//! Incidence tables between grid elements of different dimensions.

use std::collections::HashMap;

use crate::error::GridError;

use super::{EdgeId, FaceId, Grid, VertexId, VolumeId};

/// Element incidence, built once from a grid snapshot.
///
/// The tables are not updated when the grid changes; rebuild after any
/// topological edit.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    face_volumes: HashMap<FaceId, Vec<VolumeId>>,
    volume_faces: HashMap<VolumeId, Vec<FaceId>>,
    edge_faces: HashMap<EdgeId, Vec<FaceId>>,
    edge_volumes: HashMap<EdgeId, Vec<VolumeId>>,
    vertex_edges: HashMap<VertexId, Vec<EdgeId>>,
    vertex_volumes: HashMap<VertexId, Vec<VolumeId>>,
}

impl Adjacency {
    /// Builds all incidence tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a volume references a face or edge missing from the
    /// grid.
    pub fn build(grid: &Grid) -> Result<Self, GridError> {
        let mut adjacency = Self::default();

        for (edge_id, edge) in grid.edges() {
            for v in edge.vertices {
                adjacency.vertex_edges.entry(v).or_default().push(edge_id);
            }
        }

        for (face_id, _) in grid.faces() {
            for edge_id in grid.face_edges(face_id)? {
                adjacency.edge_faces.entry(edge_id).or_default().push(face_id);
            }
        }

        for (volume_id, volume) in grid.volumes() {
            let faces = grid.volume_faces(volume_id)?;
            for &face_id in &faces {
                adjacency.face_volumes.entry(face_id).or_default().push(volume_id);
            }
            adjacency.volume_faces.insert(volume_id, faces);

            for &v in &volume.vertices {
                adjacency.vertex_volumes.entry(v).or_default().push(volume_id);
            }
            for [a, b] in volume.kind.local_edges() {
                let edge_id = grid
                    .find_edge(volume.vertices[*a], volume.vertices[*b])
                    .ok_or(GridError::EntityNotFound("edge"))?;
                adjacency.edge_volumes.entry(edge_id).or_default().push(volume_id);
            }
        }

        Ok(adjacency)
    }

    /// Volumes bounded by a face: one on the mesh boundary, two inside.
    #[must_use]
    pub fn face_volumes(&self, face: FaceId) -> &[VolumeId] {
        self.face_volumes.get(&face).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn volume_faces(&self, volume: VolumeId) -> &[FaceId] {
        self.volume_faces.get(&volume).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn edge_faces(&self, edge: EdgeId) -> &[FaceId] {
        self.edge_faces.get(&edge).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn edge_volumes(&self, edge: EdgeId) -> &[VolumeId] {
        self.edge_volumes.get(&edge).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn vertex_edges(&self, vertex: VertexId) -> &[EdgeId] {
        self.vertex_edges.get(&vertex).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn vertex_volumes(&self, vertex: VertexId) -> &[VolumeId] {
        self.vertex_volumes.get(&vertex).map_or(&[], Vec::as_slice)
    }

    /// The volume on the other side of `face`, seen from `volume`.
    #[must_use]
    pub fn neighbor_across(&self, volume: VolumeId, face: FaceId) -> Option<VolumeId> {
        self.face_volumes(face).iter().copied().find(|&other| other != volume)
    }
}
