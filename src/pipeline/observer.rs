use std::fmt;

use tracing::info;

use crate::grid::{Dimension, Grid};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Profiles,
    Extrusion,
    CoarseClassification,
    Caps,
    Tetrahedralization,
    Classification,
    Boundary,
    Finalization,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Self::Profiles,
        Self::Extrusion,
        Self::CoarseClassification,
        Self::Caps,
        Self::Tetrahedralization,
        Self::Classification,
        Self::Boundary,
        Self::Finalization,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Profiles => "profiles",
            Self::Extrusion => "extrusion",
            Self::CoarseClassification => "coarse classification",
            Self::Caps => "caps",
            Self::Tetrahedralization => "tetrahedralization",
            Self::Classification => "classification",
            Self::Boundary => "boundary",
            Self::Finalization => "finalization",
        };
        f.write_str(name)
    }
}

/// Read-only hook called after every completed stage.
///
/// Snapshots taken here are diagnostics only; a failed run never resumes
/// from them.
pub trait StageObserver {
    fn stage_finished(&mut self, stage: Stage, grid: &Grid);
}

/// Ignores every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn stage_finished(&mut self, _stage: Stage, _grid: &Grid) {}
}

/// Logs element counts after every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn stage_finished(&mut self, stage: Stage, grid: &Grid) {
        info!(
            %stage,
            vertices = grid.count(Dimension::Vertex),
            edges = grid.count(Dimension::Edge),
            faces = grid.count(Dimension::Face),
            volumes = grid.count(Dimension::Volume),
            unassigned_volumes = grid.count_in_subset(Dimension::Volume, None),
            "stage finished"
        );
    }
}

impl<F: FnMut(Stage, &Grid)> StageObserver for F {
    fn stage_finished(&mut self, stage: Stage, grid: &Grid) {
        self(stage, grid);
    }
}
