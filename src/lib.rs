//! Layered tetrahedral mesh generation.
//!
//! A [`LayerStack`] of material layers, optionally holding one cylindrical
//! injection depot, is extruded into prisms, tetrahedralized and labelled:
//! every vertex, edge, face and volume ends up in a named subset.
//!
//! ```no_run
//! use strata_mesh::{GenerationParams, Injection, LayerStack, MeshAssemblyPipeline};
//!
//! # fn main() -> strata_mesh::Result<()> {
//! let mut stack = LayerStack::new();
//! stack.add_layer("Subcutis", 1.0, 0.25)?;
//! stack.add_layer_with_injection("Dermis", 2.0, 0.25, Injection::new("Depot", 0.3, 0.1, 0.4))?;
//! let mesh = MeshAssemblyPipeline::new(stack, GenerationParams::default()).run()?;
//! for subset in mesh.catalog.summary(&mesh.grid) {
//!     println!("{subset}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod math;
pub mod pipeline;
pub mod plan;
pub mod stack;

pub use catalog::SubsetCatalog;
pub use config::{GenerationJob, GenerationParams};
pub use error::{Result, StrataError};
pub use pipeline::{GeneratedMesh, MeshAssemblyPipeline};
pub use stack::{Injection, Layer, LayerStack};
