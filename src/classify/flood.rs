use tracing::debug;

use crate::error::{ClassificationError, Result};
use crate::grid::{FaceId, Grid, SubsetIndex, VolumeId};
use crate::kernel::GeometryKernel;
use crate::math::Point3;

/// Grows `target` from the volume holding `seed`.
///
/// The fill never crosses a face labelled with another subset and never
/// enters a volume that already belongs to another subset. Returns the number
/// of volumes reached.
pub(super) fn fill_region<K: GeometryKernel + ?Sized>(kernel: &mut K, seed: &Point3, target: SubsetIndex) -> Result<usize> {
    let foreign = move |subset: Option<SubsetIndex>| subset.is_some_and(|s| s != target);
    let stop = move |grid: &Grid, face: FaceId, next: VolumeId| {
        let face_blocks = grid.face(face).map(|f| foreign(f.subset)).unwrap_or(true);
        face_blocks || grid.volume(next).map(|v| foreign(v.subset)).unwrap_or(true)
    };

    let region = kernel.flood_fill_select(seed, &stop)?;
    for &volume in &region.volumes {
        if let Some(subset) = kernel.grid().volume(volume)?.subset.filter(|&s| s != target) {
            return Err(ClassificationError::SeedAlreadyAssigned { subset }.into());
        }
    }
    kernel.assign_selection_to_subset(&region, target)?;

    debug!(
        subset = target,
        volumes = region.volumes.len(),
        seed = ?[seed.x, seed.y, seed.z],
        "flood fill"
    );
    Ok(region.volumes.len())
}
