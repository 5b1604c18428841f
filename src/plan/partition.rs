use tracing::{debug, info};

use crate::config::GenerationParams;
use crate::error::Result;
use crate::grid::SubsetIndex;
use crate::math::{AxisSegment, CylinderRegion, Point3, RegularPolygon, Vector3, SELECTION_THRESHOLD, TOLERANCE};
use crate::stack::{validate_generation, Injection, Layer, LayerStack};

use super::{AxialWindow, DepotWindow, SubsetNumbering, SubsetRole, WindowKind};

/// Relative slack before a height/resolution ratio is rounded up.
const STEP_RATIO_SLACK: f64 = 1e-9;

/// Boundary slack as a fraction of the thinnest extrusion step. Tetrahedron
/// centroids sit at least a quarter step away from every step plane.
const SLACK_PER_STEP: f64 = 0.125;

/// Windows and subset numbering for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionPlan {
    /// Windows bottom to top; consecutive windows share their bounding plane.
    pub windows: Vec<AxialWindow>,
    pub numbering: SubsetNumbering,
    /// Height of the stack's bottom plane.
    pub base: f64,
    pub total_height: f64,
}

impl PartitionPlan {
    /// The depot band and its nested depot, if the stack has an injection.
    #[must_use]
    pub fn depot(&self) -> Option<(&AxialWindow, &DepotWindow)> {
        self.windows
            .iter()
            .find_map(|window| window.depot.as_ref().map(|depot| (window, depot)))
    }

    /// The reserved outer-surface subset.
    #[must_use]
    pub fn surface(&self) -> SubsetIndex {
        self.numbering.surface().unwrap_or(self.numbering.len())
    }

    /// Height of the stack's top plane.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.base + self.total_height
    }
}

/// Number of extrusion increments for a slab of `height`.
///
/// Ratios that are whole numbers up to floating-point noise are not rounded
/// up. Never less than one.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn extrusion_steps(height: f64, resolution: f64) -> usize {
    let ratio = height / resolution;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= STEP_RATIO_SLACK * nearest.max(1.0) {
        nearest
    } else {
        ratio.ceil()
    };
    steps.max(1.0) as usize
}

/// Computes the axial windows, step counts and subset numbering of a stack.
pub struct PlanPartition<'a> {
    stack: &'a LayerStack,
    params: &'a GenerationParams,
}

impl<'a> PlanPartition<'a> {
    /// Creates a new `PlanPartition` operation.
    #[must_use]
    pub fn new(stack: &'a LayerStack, params: &'a GenerationParams) -> Self {
        Self { stack, params }
    }

    /// Validates the stack against the parameters and plans the partition.
    ///
    /// The stack base is the main cylinder center's height. Only the `x` and
    /// `y` of the injection center are used; the depot's height follows from
    /// the injection's relative position.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`](crate::error::ConfigurationError) if
    /// the stack or the parameters are invalid.
    pub fn execute(&self) -> Result<PartitionPlan> {
        validate_generation(self.stack, self.params)?;

        let base = self.params.main.center_point().z;
        let mut numbering = SubsetNumbering::default();
        let mut windows = Vec::with_capacity(self.stack.len() + 2);
        let mut z = base;

        for (position, layer) in self.stack.layers().iter().enumerate() {
            let subset = numbering.push(layer.name.clone(), SubsetRole::Layer, Some(position));
            let top = z + layer.thickness;
            match &layer.injection {
                None => windows.push(self.window(position, WindowKind::Plain, z, top, layer.resolution, subset)),
                Some(injection) => {
                    let shell = numbering.push(injection.name.clone(), SubsetRole::InjectionShell, Some(position));
                    let inner = injection.with_inner_boundary.then(|| {
                        numbering.push(
                            format!("{} Interior", injection.name),
                            SubsetRole::InjectionInner,
                            Some(position),
                        )
                    });
                    self.split_layer(&mut windows, position, layer, injection, z, subset, shell, inner);
                }
            }
            z = top;
        }
        numbering.push("Surface", SubsetRole::Surface, None);

        let slack = boundary_slack(&windows);
        for window in &mut windows {
            window.region.axis = window.region.axis.with_slack(slack);
            if let Some(depot) = &mut window.depot {
                depot.region.axis = depot.region.axis.with_slack(slack);
            }
        }
        if let Some(last) = windows.last_mut() {
            last.region.axis = last.region.axis.closed();
            if let Some(depot) = &mut last.depot {
                depot.region.axis = depot.region.axis.closed();
            }
        }

        for window in &windows {
            debug!(
                layer = window.layer,
                kind = ?window.kind,
                z_low = window.region.axis.z_low,
                z_high = window.region.axis.z_high,
                steps = window.steps,
                subset = window.subset,
                "planned window"
            );
        }
        info!(windows = windows.len(), subsets = numbering.len(), slack, "planned axial partition");

        Ok(PartitionPlan {
            windows,
            numbering,
            base,
            total_height: self.stack.total_height(),
        })
    }

    fn window(
        &self,
        layer: usize,
        kind: WindowKind,
        z_low: f64,
        z_high: f64,
        resolution: f64,
        subset: SubsetIndex,
    ) -> AxialWindow {
        let axis = AxisSegment::new(self.params.main.center_point(), z_low, z_high);
        AxialWindow {
            layer,
            kind,
            region: CylinderRegion::new(axis, self.params.main.radius),
            steps: extrusion_steps(z_high - z_low, resolution),
            subset,
            depot: None,
        }
    }

    /// Below-depot, depot band and above-depot windows of an injection layer.
    /// Slabs of vanishing height are left out.
    #[allow(clippy::too_many_arguments)]
    fn split_layer(
        &self,
        windows: &mut Vec<AxialWindow>,
        position: usize,
        layer: &Layer,
        injection: &Injection,
        z: f64,
        subset: SubsetIndex,
        shell: SubsetIndex,
        inner: Option<SubsetIndex>,
    ) {
        let z1 = z + injection.below(layer.thickness);
        let z3 = z + layer.thickness;
        // Validation lets the depot overshoot the layer top by TOLERANCE.
        let z2 = (z1 + injection.thickness).min(z3);

        if z1 - z > TOLERANCE {
            windows.push(self.window(position, WindowKind::BelowDepot, z, z1, layer.resolution, subset));
        }

        let mut band = self.window(position, WindowKind::DepotBand, z1, z2, injection.resolution, subset);
        let depot_center = self.injection_center(z);
        let axis = AxisSegment::new(depot_center, z1, z2);
        let (depot_seed, surrounding_seed) = self.seeds(axis.mid_height());
        band.depot = Some(DepotWindow {
            region: CylinderRegion::new(axis, self.params.injection.radius)
                .with_facets(self.params.injection.vertex_count),
            shell,
            inner,
            depot_seed,
            surrounding_seed,
        });
        windows.push(band);

        if z3 - z2 > TOLERANCE {
            windows.push(self.window(position, WindowKind::AboveDepot, z2, z3, layer.resolution, subset));
        }
    }

    fn injection_center(&self, z: f64) -> Point3 {
        let [x, y, _] = self.params.injection.center;
        Point3::new(x, y, z)
    }

    /// Depot seed on the injection axis; surrounding seed halfway between the
    /// injection polygon and the main polygon, on the side facing away from
    /// the main center. Both at height `z`.
    fn seeds(&self, z: f64) -> (Point3, Point3) {
        let main = self.params.main.center_point();
        let depot = self.injection_center(z);
        let offset = Vector3::new(depot.x - main.x, depot.y - main.y, 0.0);
        let distance = offset.norm();
        let away = if distance > TOLERANCE {
            -offset / distance
        } else {
            -Vector3::x()
        };
        let (main_params, injection) = (&self.params.main, &self.params.injection);
        let wall = RegularPolygon::new(main, main_params.radius, main_params.vertex_count);
        let shell = RegularPolygon::new(depot, injection.radius, injection.vertex_count);
        let reach = 0.5 * (shell.exit_distance(&depot, &away) + wall.exit_distance(&depot, &away));
        (depot, depot + away * reach)
    }
}

/// Axial slack shared by every window: [`SELECTION_THRESHOLD`], narrowed for
/// stacks whose thinnest extrusion step is too thin to absorb it.
#[allow(clippy::cast_precision_loss)]
fn boundary_slack(windows: &[AxialWindow]) -> f64 {
    windows
        .iter()
        .map(|window| SLACK_PER_STEP * window.height() / window.steps as f64)
        .fold(SELECTION_THRESHOLD, f64::min)
}
