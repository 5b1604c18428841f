use tracing::debug;

use crate::error::Result;
use crate::grid::Dimension;
use crate::kernel::GeometryKernel;
use crate::plan::AxialWindow;

/// Assigns the volumes of `window` by cylinder test. In a depot band the
/// nested depot test runs second and overrides the layer.
pub(super) fn assign_window<K: GeometryKernel + ?Sized>(kernel: &mut K, window: &AxialWindow) -> Result<usize> {
    let layer = kernel.select_in_cylinder(Dimension::Volume, &window.region)?;
    kernel.assign_selection_to_subset(&layer, window.subset)?;
    let mut assigned = layer.volumes.len();

    if let Some(depot) = &window.depot {
        let inside = kernel.select_in_cylinder(Dimension::Volume, &depot.region)?;
        kernel.assign_selection_to_subset(&inside, depot.volume_subset())?;
        debug!(layer = window.layer, depot = inside.volumes.len(), "depot volumes by cylinder test");
        assigned += inside.volumes.len();
    }

    debug!(layer = window.layer, kind = ?window.kind, volumes = layer.volumes.len(), "window volumes by cylinder test");
    Ok(assigned)
}
