use crate::grid::SubsetIndex;
use crate::math::{CylinderRegion, Point3};

/// Where a window sits relative to the depot of its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// A whole layer without injection.
    Plain,
    BelowDepot,
    /// The slab holding the depot and the layer material around it.
    DepotBand,
    AboveDepot,
}

/// The depot nested in a [`WindowKind::DepotBand`] window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepotWindow {
    /// Injection cylinder over the band's axial interval.
    pub region: CylinderRegion,
    pub shell: SubsetIndex,
    pub inner: Option<SubsetIndex>,
    /// Interior point of the depot.
    pub depot_seed: Point3,
    /// Point of the band between the depot and the main cylinder wall.
    pub surrounding_seed: Point3,
}

impl DepotWindow {
    /// The subset the depot volumes end up in.
    #[must_use]
    pub fn volume_subset(&self) -> SubsetIndex {
        self.inner.unwrap_or(self.shell)
    }
}

/// One axial slab of the stack, extruded in one go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialWindow {
    /// Stack position of the owning layer.
    pub layer: usize,
    pub kind: WindowKind,
    /// Main cylinder over the window's axial interval.
    pub region: CylinderRegion,
    /// Number of extrusion increments.
    pub steps: usize,
    /// Layer subset.
    pub subset: SubsetIndex,
    pub depot: Option<DepotWindow>,
}

impl AxialWindow {
    #[must_use]
    pub fn height(&self) -> f64 {
        self.region.axis.height()
    }
}
