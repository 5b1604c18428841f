mod job;

pub use job::{GenerationJob, InjectionSpec, LayerSpec};

use serde::{Deserialize, Serialize};

use crate::math::Point3;

/// Cross-section of an upright cylinder and its polygonal resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderParams {
    /// Center of the circle; the main cylinder's `z` is the stack base.
    pub center: [f64; 3],
    pub radius: f64,
    /// Number of polygon vertices approximating the circle.
    pub vertex_count: usize,
}

impl CylinderParams {
    #[must_use]
    pub fn new(center: Point3, radius: f64, vertex_count: usize) -> Self {
        Self {
            center: [center.x, center.y, center.z],
            radius,
            vertex_count,
        }
    }

    #[must_use]
    pub fn center_point(&self) -> Point3 {
        Point3::new(self.center[0], self.center[1], self.center[2])
    }
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: 1.0,
            vertex_count: 10,
        }
    }
}

/// Global parameters of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Outer cylinder holding the whole stack.
    pub main: CylinderParams,
    /// Depot cylinder; only used when the stack carries an injection.
    pub injection: CylinderParams,
    /// Angle bound, in degrees, for the cap triangulation.
    pub min_triangle_angle_deg: f64,
    /// Upper bound on the tetrahedra's circumradius-to-shortest-edge ratio.
    pub tetrahedral_quality: f64,
    /// Keep face, edge and vertex subsets across tetrahedralization.
    pub preserve_boundary_subsets: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            main: CylinderParams::default(),
            injection: CylinderParams {
                radius: 0.5,
                ..CylinderParams::default()
            },
            min_triangle_angle_deg: 30.0,
            tetrahedral_quality: 2.0,
            preserve_boundary_subsets: true,
        }
    }
}
