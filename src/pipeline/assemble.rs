use tracing::{debug, info};

use crate::catalog::SubsetCatalog;
use crate::classify::{fill_unassigned_sides, ClassifyRegions, Pass};
use crate::config::GenerationParams;
use crate::error::{ConfigurationError, KernelError, Result};
use crate::grid::{Grid, Selection};
use crate::kernel::{close_faces, BuiltinKernel, GeometryKernel};
use crate::math::Point3;
use crate::plan::{PartitionPlan, PlanPartition};
use crate::stack::LayerStack;

use super::{NoopObserver, Stage, StageObserver};

/// A finished, fully labelled tetrahedral mesh.
#[derive(Debug, Clone)]
pub struct GeneratedMesh {
    pub grid: Grid,
    /// Names and colors; subset `i` of the grid is `catalog.subsets()[i]`.
    pub catalog: SubsetCatalog,
    /// The partition the mesh was built from.
    pub plan: PartitionPlan,
}

/// Drives a geometry kernel through the fixed generation stages.
///
/// The pipeline owns the stack, so the stack cannot change during a run,
/// and the kernel, so nothing else touches the mesh under construction.
/// Every error is fatal; a failed run leaves no usable mesh.
pub struct MeshAssemblyPipeline<K = BuiltinKernel, O = NoopObserver> {
    stack: LayerStack,
    params: GenerationParams,
    kernel: K,
    observer: O,
}

impl MeshAssemblyPipeline {
    /// Creates a pipeline on the built-in kernel.
    #[must_use]
    pub fn new(stack: LayerStack, params: GenerationParams) -> Self {
        Self {
            stack,
            params,
            kernel: BuiltinKernel::new(),
            observer: NoopObserver,
        }
    }
}

impl<K: GeometryKernel, O: StageObserver> MeshAssemblyPipeline<K, O> {
    /// Swaps the geometry kernel.
    #[must_use]
    pub fn with_kernel<K2: GeometryKernel>(self, kernel: K2) -> MeshAssemblyPipeline<K2, O> {
        MeshAssemblyPipeline {
            stack: self.stack,
            params: self.params,
            kernel,
            observer: self.observer,
        }
    }

    /// Installs a hook called after every stage.
    #[must_use]
    pub fn with_observer<O2: StageObserver>(self, observer: O2) -> MeshAssemblyPipeline<K, O2> {
        MeshAssemblyPipeline {
            stack: self.stack,
            params: self.params,
            kernel: self.kernel,
            observer,
        }
    }

    /// Runs every stage and returns the labelled mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`](crate::error::ConfigurationError)
    /// before any kernel call if the stack or parameters are invalid, and
    /// fails on the first kernel, grid or classification error after that.
    pub fn run(self) -> Result<GeneratedMesh> {
        let Self {
            stack,
            params,
            mut kernel,
            mut observer,
        } = self;
        info!(layers = stack.len(), height = stack.total_height(), "starting mesh generation");

        let plan = PlanPartition::new(&stack, &params).execute()?;

        let bottom = build_caps(&mut kernel, &plan, &params)?;
        observer.stage_finished(Stage::Profiles, kernel.grid());

        let top = extrude_windows(&mut kernel, &plan, &bottom)?;
        observer.stage_finished(Stage::Extrusion, kernel.grid());

        ClassifyRegions::new(&plan, Pass::Coarse).execute(&mut kernel)?;
        observer.stage_finished(Stage::CoarseClassification, kernel.grid());

        let mut caps = bottom;
        caps.extend(&top);
        let caps = close_faces(kernel.grid(), &caps)?;
        kernel.assign_selection_to_subset(&caps, plan.surface())?;
        observer.stage_finished(Stage::Caps, kernel.grid());

        let report = kernel.tetrahedralize(params.tetrahedral_quality, params.preserve_boundary_subsets)?;
        observer.stage_finished(Stage::Tetrahedralization, kernel.grid());

        ClassifyRegions::new(&plan, Pass::Authoritative)
            .boundary_subsets_preserved(params.preserve_boundary_subsets)
            .execute(&mut kernel)?;
        observer.stage_finished(Stage::Classification, kernel.grid());

        let boundary = kernel.extract_boundary()?;
        kernel.assign_selection_to_subset(&boundary, plan.surface())?;
        debug!(faces = boundary.faces.len(), "assigned outer boundary");
        observer.stage_finished(Stage::Boundary, kernel.grid());

        let mut catalog = SubsetCatalog::from_numbering(&plan.numbering);
        catalog.rename_depot(kernel.grid());
        let filled = fill_unassigned_sides(kernel.grid_mut())?;
        kernel.grid().ensure_fully_assigned()?;
        let dropped = catalog.cleanup(kernel.grid_mut());
        observer.stage_finished(Stage::Finalization, kernel.grid());

        info!(
            tetrahedra = report.tetrahedra,
            subsets = catalog.len(),
            dropped,
            filled,
            "mesh generation finished"
        );
        Ok(GeneratedMesh {
            grid: kernel.into_grid(),
            catalog,
            plan,
        })
    }
}

/// Builds the main and, with a depot, the injection profile on the base
/// plane and triangulates the cap between them. Returns the cap faces.
pub(crate) fn build_caps<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    plan: &PartitionPlan,
    params: &GenerationParams,
) -> Result<Selection> {
    let first = plan.windows.first().ok_or(ConfigurationError::EmptyStack)?;
    let main = params.main.center_point();
    let mut boundary = kernel.make_circle_profile(main, params.main.radius, params.main.vertex_count, first.subset)?;

    if let Some((_, depot)) = plan.depot() {
        let [x, y, _] = params.injection.center;
        let profile = kernel.make_circle_profile(
            Point3::new(x, y, plan.base),
            params.injection.radius,
            params.injection.vertex_count,
            depot.shell,
        )?;
        boundary.extend(&profile);
    }

    kernel.triangulate_boundary(&boundary)?;
    kernel.retriangulate(params.min_triangle_angle_deg)
}

/// Extrudes the cap through every window in turn. Returns the top cap.
pub(crate) fn extrude_windows<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    plan: &PartitionPlan,
    bottom: &Selection,
) -> Result<Selection> {
    let mut top = bottom.clone();
    for window in &plan.windows {
        top = kernel.extrude_and_offset(&top, window.height(), window.steps)?;
        if top.faces.is_empty() {
            return Err(KernelError::EmptySelection(format!("layer {} left no faces to extrude", window.layer)).into());
        }
        debug!(layer = window.layer, kind = ?window.kind, steps = window.steps, "extruded window");
    }
    Ok(top)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::Dimension;
    use crate::stack::Injection;

    fn two_layers() -> LayerStack {
        let mut stack = LayerStack::new();
        stack.add_layer("Subcutis", 0.5, 0.25).unwrap();
        stack.add_layer("Epidermis", 0.25, 0.25).unwrap();
        stack
    }

    #[test]
    fn stages_run_in_order() {
        let mut seen = Vec::new();
        MeshAssemblyPipeline::new(two_layers(), GenerationParams::default())
            .with_observer(|stage: Stage, _: &Grid| seen.push(stage))
            .run()
            .unwrap();
        assert_eq!(seen, Stage::ALL);
    }

    #[test]
    fn extrusion_stacks_prisms_per_step() {
        let stack = two_layers();
        let params = GenerationParams::default();
        let plan = PlanPartition::new(&stack, &params).execute().unwrap();
        let mut kernel = BuiltinKernel::new();
        let bottom = build_caps(&mut kernel, &plan, &params).unwrap();
        let top = extrude_windows(&mut kernel, &plan, &bottom).unwrap();
        assert_eq!(top.faces.len(), bottom.faces.len());
        // Two steps in the first layer, one in the second.
        assert_eq!(kernel.grid().count(Dimension::Volume), 3 * bottom.faces.len());
    }

    #[test]
    fn injection_profile_is_part_of_the_cap() {
        let mut stack = LayerStack::new();
        stack
            .add_layer_with_injection("Dermis", 1.0, 0.5, Injection::new("Depot", 0.25, 0.25, 0.25))
            .unwrap();
        let params = GenerationParams::default();
        let plan = PlanPartition::new(&stack, &params).execute().unwrap();
        let mut kernel = BuiltinKernel::new();
        let cap = build_caps(&mut kernel, &plan, &params).unwrap();
        let (_, depot) = plan.depot().unwrap();
        let region = depot.region;
        let inside = cap
            .faces
            .iter()
            .filter(|&&f| {
                let mut c = kernel.grid().centroid(crate::grid::Element::Face(f)).unwrap();
                c.z = region.axis.mid_height();
                region.contains(&c)
            })
            .count();
        assert!(inside > 0);
        assert!(inside < cap.faces.len());
    }

    #[test]
    fn invalid_parameters_fail_before_any_geometry() {
        let mut params = GenerationParams::default();
        params.main.radius = 0.0;
        let mut calls = 0;
        let result = MeshAssemblyPipeline::new(two_layers(), params)
            .with_observer(|_: Stage, _: &Grid| calls += 1)
            .run();
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }
}
