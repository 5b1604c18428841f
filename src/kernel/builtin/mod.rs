mod boundary;
mod extrude;
mod profile;
mod select;
mod tetrahedralize;
mod triangulate;

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{KernelError, Result};
use crate::grid::{Dimension, FaceId, Grid, Selection, SubsetIndex, VertexId};
use crate::math::{CylinderRegion, Point3};

use super::{FloodBarrier, GeometryKernel, TetrahedralizeReport};

/// The last triangulated cap, kept so it can be refined in place.
#[derive(Debug, Clone)]
struct Cap {
    faces: BTreeSet<FaceId>,
    constraints: Vec<[VertexId; 2]>,
}

/// Self-contained kernel: spade for planar triangulation, prism sweeps for
/// extrusion and a conforming prism split for tetrahedralization.
#[derive(Debug, Default)]
pub struct BuiltinKernel {
    grid: Grid,
    cap: Option<Cap>,
}

impl BuiltinKernel {
    /// Creates a kernel with an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store_cap(&mut self, cap: triangulate::Triangulated) -> Selection {
        let selection = Selection::from_faces(cap.faces.iter().copied());
        self.cap = Some(Cap {
            faces: cap.faces,
            constraints: cap.constraints,
        });
        selection
    }
}

impl GeometryKernel for BuiltinKernel {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    fn into_grid(self) -> Grid {
        self.grid
    }

    fn make_circle_profile(
        &mut self,
        center: Point3,
        radius: f64,
        vertex_count: usize,
        subset: SubsetIndex,
    ) -> Result<Selection> {
        let profile = profile::make_circle(&mut self.grid, center, radius, vertex_count, subset)?;
        debug!(radius, vertex_count, subset, "created circle profile");
        Ok(profile)
    }

    fn triangulate_boundary(&mut self, edges: &Selection) -> Result<Selection> {
        let mut constraints = Vec::with_capacity(edges.edges.len());
        for &edge in &edges.edges {
            constraints.push(self.grid.edge(edge)?.vertices);
        }
        let cap = triangulate::triangulate(&mut self.grid, &constraints, None)?;
        debug!(faces = cap.faces.len(), "triangulated boundary");
        Ok(self.store_cap(cap))
    }

    fn retriangulate(&mut self, min_angle_deg: f64) -> Result<Selection> {
        let cap = self
            .cap
            .take()
            .ok_or_else(|| KernelError::EmptySelection("no cap to retriangulate".into()))?;
        if self.grid.count(Dimension::Volume) > 0 {
            return Err(KernelError::Triangulation("cap has already been extruded".into()).into());
        }
        for &face in &cap.faces {
            self.grid.remove_face(face);
        }
        let refined = triangulate::triangulate(&mut self.grid, &cap.constraints, Some(min_angle_deg))?;
        let orphans = self.grid.remove_orphan_edges();
        debug!(
            faces = refined.faces.len(),
            orphans,
            min_angle_deg,
            "retriangulated cap"
        );
        Ok(self.store_cap(refined))
    }

    fn extrude_and_offset(&mut self, faces: &Selection, offset: f64, steps: usize) -> Result<Selection> {
        let top = extrude::extrude(&mut self.grid, faces, offset, steps)?;
        debug!(offset, steps, top = top.faces.len(), "extruded faces");
        Ok(top)
    }

    fn select_in_cylinder(&self, dimension: Dimension, region: &CylinderRegion) -> Result<Selection> {
        select::in_cylinder(&self.grid, dimension, region)
    }

    fn flood_fill_select(&self, seed: &Point3, stop: &FloodBarrier<'_>) -> Result<Selection> {
        select::flood_fill(&self.grid, seed, stop)
    }

    fn tetrahedralize(&mut self, quality: f64, preserve_boundary_subsets: bool) -> Result<TetrahedralizeReport> {
        tetrahedralize::tetrahedralize(&mut self.grid, quality, preserve_boundary_subsets)
    }

    fn extract_boundary(&self) -> Result<Selection> {
        boundary::extract(&self.grid)
    }
}
