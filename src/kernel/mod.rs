//! The geometry kernel consumed by the assembly pipeline.
//!
//! [`GeometryKernel`] is the contract: circle profiles, cap triangulation,
//! extrusion, geometric and connectivity selections, subset assignment,
//! tetrahedralization and boundary extraction over one exclusively owned
//! [`Grid`]. [`BuiltinKernel`] implements it on top of spade.

mod builtin;

pub use builtin::BuiltinKernel;

use crate::error::Result;
use crate::grid::{Dimension, Element, FaceId, Grid, Selection, SubsetIndex, VolumeId};
use crate::math::{CylinderRegion, Point3};

/// Decides whether a flood fill must not cross `FaceId` into `VolumeId`.
pub type FloodBarrier<'a> = dyn Fn(&Grid, FaceId, VolumeId) -> bool + 'a;

/// Outcome of a tetrahedralization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetrahedralizeReport {
    /// Number of tetrahedra in the grid afterwards.
    pub tetrahedra: usize,
    /// Tetrahedra whose radius-edge ratio exceeds the quality target.
    pub above_quality_target: usize,
    /// Largest radius-edge ratio found.
    pub worst_radius_edge_ratio: f64,
}

/// Geometry operations the pipeline drives, in the order it needs them.
///
/// Every fallible call is fatal for the run; implementations report failures
/// as [`KernelError`](crate::error::KernelError) and never retry.
pub trait GeometryKernel {
    /// The mesh under construction.
    fn grid(&self) -> &Grid;

    /// Mutable access for classification passes.
    fn grid_mut(&mut self) -> &mut Grid;

    /// Hands the finished mesh over.
    fn into_grid(self) -> Grid
    where
        Self: Sized;

    /// Creates a closed polygon of `vertex_count` vertices approximating a
    /// circle in the plane `z = center.z`. Vertices and edges go to `subset`.
    ///
    /// # Errors
    ///
    /// Fails for fewer than three vertices or a non-positive radius.
    fn make_circle_profile(
        &mut self,
        center: Point3,
        radius: f64,
        vertex_count: usize,
        subset: SubsetIndex,
    ) -> Result<Selection>;

    /// Triangulates the planar region bounded by the selected edges and
    /// returns the new cap faces.
    ///
    /// # Errors
    ///
    /// Fails for non-planar or self-intersecting boundaries.
    fn triangulate_boundary(&mut self, edges: &Selection) -> Result<Selection>;

    /// Rebuilds the last triangulated cap so every triangle respects the angle
    /// bound, returning the new cap faces.
    ///
    /// # Errors
    ///
    /// Fails if there is no cap or the cap has already been extruded.
    fn retriangulate(&mut self, min_angle_deg: f64) -> Result<Selection>;

    /// Sweeps the selected triangles `offset` along +z in `steps` equal
    /// increments, returning the faces on top of the new layer of prisms.
    ///
    /// # Errors
    ///
    /// Fails for an empty selection, non-triangular faces, zero steps or a
    /// vanishing offset.
    fn extrude_and_offset(&mut self, faces: &Selection, offset: f64, steps: usize) -> Result<Selection>;

    /// Elements of one dimension whose representative point lies in `region`.
    ///
    /// # Errors
    ///
    /// Fails if the grid is inconsistent.
    fn select_in_cylinder(&self, dimension: Dimension, region: &CylinderRegion) -> Result<Selection>;

    /// Volumes reachable from the volume containing `seed` through shared
    /// faces, never crossing a face for which `stop` holds.
    ///
    /// # Errors
    ///
    /// Fails if no volume contains `seed`.
    fn flood_fill_select(&self, seed: &Point3, stop: &FloodBarrier<'_>) -> Result<Selection>;

    /// Moves every selected element into `subset`.
    ///
    /// # Errors
    ///
    /// Fails if a selected element no longer exists.
    fn assign_selection_to_subset(&mut self, selection: &Selection, subset: SubsetIndex) -> Result<()> {
        let grid = self.grid_mut();
        for element in selection.iter() {
            grid.set_subset(element, Some(subset))?;
        }
        Ok(())
    }

    /// Replaces every volume by tetrahedra. Volume subsets are cleared; side
    /// subsets survive only when `preserve_boundary_subsets` is set.
    ///
    /// # Errors
    ///
    /// Fails for degenerate or non-conforming volumes.
    fn tetrahedralize(&mut self, quality: f64, preserve_boundary_subsets: bool) -> Result<TetrahedralizeReport>;

    /// Faces bounding exactly one volume, with their edges and vertices.
    ///
    /// # Errors
    ///
    /// Fails if the grid is inconsistent.
    fn extract_boundary(&self) -> Result<Selection>;
}

/// Selection of every element touching `faces`: the faces, their edges and
/// their vertices.
///
/// # Errors
///
/// Fails if a face or one of its edges is missing.
pub fn close_faces(grid: &Grid, faces: &Selection) -> Result<Selection> {
    let mut closure = Selection::new();
    for &face in &faces.faces {
        closure.insert(Element::Face(face));
        for edge in grid.face_edges(face)? {
            closure.insert(Element::Edge(edge));
        }
        for &vertex in &grid.face(face)?.vertices {
            closure.insert(Element::Vertex(vertex));
        }
    }
    Ok(closure)
}
