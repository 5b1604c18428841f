//! Subset assignment of mesh elements.
//!
//! [`ClassifyRegions`] labels volumes by the planner's windows, either with
//! cylinder tests alone ([`Pass::Coarse`], on the extruded prisms) or, after
//! tetrahedralization, with cylinder tests outside the depot band and seeded
//! flood fill inside it ([`Pass::Authoritative`]). Sides are derived from the
//! volumes afterwards.

mod flood;
mod sides;
mod window;

pub use sides::{depot_shell, fill_unassigned_sides, recompute_sides};

use tracing::{debug, info};

use crate::error::Result;
use crate::kernel::GeometryKernel;
use crate::plan::PartitionPlan;

/// Which classification run of the pipeline this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// On the extruded prisms, before tetrahedralization.
    Coarse,
    /// On the tetrahedra; the labels that end up in the output.
    Authoritative,
}

/// What a classification pass assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationReport {
    /// Volumes assigned by cylinder test.
    pub by_cylinder: usize,
    /// Volumes reached from the depot seed.
    pub depot: usize,
    /// Volumes reached from the surrounding seed.
    pub surrounding: usize,
    /// Elements moved to the depot shell.
    pub shell: usize,
    /// Sides that had to fall back to their volumes' subsets.
    pub side_fallbacks: usize,
}

/// Assigns every volume to a subset of the plan and derives the sides.
pub struct ClassifyRegions<'a> {
    plan: &'a PartitionPlan,
    pass: Pass,
    flood_fill_depot: bool,
}

impl<'a> ClassifyRegions<'a> {
    /// Creates a new `ClassifyRegions` operation.
    #[must_use]
    pub fn new(plan: &'a PartitionPlan, pass: Pass) -> Self {
        Self {
            plan,
            pass,
            flood_fill_depot: true,
        }
    }

    /// Whether face labels survived tetrahedralization. Without them the
    /// flood fill has no barrier, so the depot band falls back to cylinder
    /// tests.
    #[must_use]
    pub fn boundary_subsets_preserved(mut self, preserved: bool) -> Self {
        self.flood_fill_depot = preserved;
        self
    }

    /// Runs the pass.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`](crate::error::KernelError) if a seed lies
    /// outside the mesh and a
    /// [`ClassificationError`](crate::error::ClassificationError) if a seed
    /// lands in a volume already claimed by another subset.
    pub fn execute<K: GeometryKernel + ?Sized>(&self, kernel: &mut K) -> Result<ClassificationReport> {
        let mut report = ClassificationReport::default();
        let flood = self.pass == Pass::Authoritative && self.flood_fill_depot;

        for window in &self.plan.windows {
            if flood && window.depot.is_some() {
                continue;
            }
            report.by_cylinder += window::assign_window(kernel, window)?;
        }

        if flood {
            if let Some((band, depot)) = self.plan.depot() {
                report.depot = flood::fill_region(kernel, &depot.depot_seed, depot.volume_subset())?;
                report.surrounding = flood::fill_region(kernel, &depot.surrounding_seed, band.subset)?;
            }
        }

        report.side_fallbacks = recompute_sides(kernel.grid_mut())?;

        if let Some((_, depot)) = self.plan.depot() {
            if let Some(inner) = depot.inner {
                let shell = depot_shell(kernel.grid(), inner)?;
                kernel.assign_selection_to_subset(&shell, depot.shell)?;
                report.shell = shell.len();
                debug!(faces = shell.faces.len(), "marked depot shell");
            }
        }

        info!(
            pass = ?self.pass,
            by_cylinder = report.by_cylinder,
            depot = report.depot,
            surrounding = report.surrounding,
            shell = report.shell,
            "classified regions"
        );
        Ok(report)
    }
}
