mod layer;
mod layer_stack;
mod validate;

pub use layer::{Injection, Layer};
pub use layer_stack::LayerStack;
pub use validate::{validate_generation, validate_injection};
