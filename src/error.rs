use thiserror::Error;

use crate::grid::Dimension;

/// Top-level error type for layered mesh generation.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

/// Invalid stack declarations or generation parameters.
///
/// Raised before any geometry kernel call is made.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("injection `{injection}` ({injection_thickness}) is thicker than layer `{layer}` ({layer_thickness})")]
    InjectionThickerThanLayer {
        layer: String,
        layer_thickness: f64,
        injection: String,
        injection_thickness: f64,
    },

    #[error("injection `{injection}` reaches {top} but layer `{layer}` is only {layer_thickness} thick")]
    InjectionExceedsLayer {
        layer: String,
        layer_thickness: f64,
        injection: String,
        top: f64,
    },

    #[error("{parameter} must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} = {value} is out of range ({min}, {max})")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{which} cylinder radius must be positive, got {value}")]
    InvalidRadius { which: &'static str, value: f64 },

    #[error("injection cylinder (offset {offset}, radius {radius}) does not fit inside the main cylinder (radius {main_radius})")]
    InjectionOutsideMainCylinder {
        offset: f64,
        radius: f64,
        main_radius: f64,
    },

    #[error("at most one injection per stack is supported, found {count}")]
    MultipleInjections { count: usize },

    #[error("{which} profile needs at least 3 vertices, got {count}")]
    TooFewVertices { which: &'static str, count: usize },

    #[error("layer stack is empty")]
    EmptyStack,

    #[error("invalid generation job: {0}")]
    InvalidJob(String),
}

/// Failures reported by the geometry kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("tetrahedralization failed: {0}")]
    Tetrahedralization(String),

    #[error("empty selection: {0}")]
    EmptySelection(String),

    #[error("seed point ({x}, {y}, {z}) lies outside the volume mesh")]
    SeedOutsideMesh { x: f64, y: f64, z: f64 },
}

/// Errors related to the volume grid store.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("volume needs {expected} vertices, got {found}")]
    WrongVertexCount { expected: usize, found: usize },

    #[error("{count} {dimension} element(s) left without a subset")]
    Unassigned { dimension: Dimension, count: usize },
}

/// Errors raised while labelling mesh elements.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("flood-fill seed landed in a volume already assigned to subset {subset}")]
    SeedAlreadyAssigned { subset: usize },
}

/// Convenience type alias for results using [`StrataError`].
pub type Result<T> = std::result::Result<T, StrataError>;
