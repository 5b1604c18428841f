//! Axial partitioning of a layer stack.
//!
//! [`PlanPartition`] turns a validated [`LayerStack`](crate::stack::LayerStack)
//! into the windows the pipeline extrudes and classifies, together with the
//! one [`SubsetNumbering`] every later stage reads.

mod numbering;
mod partition;
mod window;

pub use numbering::{SubsetEntry, SubsetNumbering, SubsetRole};
pub use partition::{extrusion_steps, PartitionPlan, PlanPartition};
pub use window::{AxialWindow, DepotWindow, WindowKind};
