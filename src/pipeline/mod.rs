//! End-to-end generation: plan, build, classify and finalize one mesh.

mod assemble;
mod observer;

pub use assemble::{GeneratedMesh, MeshAssemblyPipeline};
pub use observer::{NoopObserver, Stage, StageObserver, TracingObserver};

#[cfg(test)]
pub(crate) use assemble::{build_caps, extrude_windows};
