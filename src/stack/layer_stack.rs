use tracing::debug;

use crate::error::Result;

use super::validate::{ensure_positive, validate_injection};
use super::{Injection, Layer};

/// Ordered layers, bottom to top, with at most one injection.
///
/// Layers are only ever appended. Generation consumes the stack, so it cannot
/// change once a run has started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain layer on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonPositive`](crate::error::ConfigurationError::NonPositive) if the thickness or the
    /// resolution is not positive.
    pub fn add_layer(&mut self, name: impl Into<String>, thickness: f64, resolution: f64) -> Result<()> {
        ensure_positive("layer thickness", thickness)?;
        ensure_positive("layer resolution", resolution)?;
        let layer = Layer::new(name, thickness, resolution);
        debug!(layer = %layer.name, thickness, resolution, "appending layer");
        self.layers.push(layer);
        Ok(())
    }

    /// Appends a layer carrying an injection.
    ///
    /// The injection geometry is checked against the layer before anything is
    /// appended; on failure the stack is left untouched. A second injection in
    /// the same stack is accepted here and rejected when generation starts.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`](crate::error::ConfigurationError) if the layer parameters are not
    /// positive or the depot does not fit inside the layer.
    pub fn add_layer_with_injection(
        &mut self,
        name: impl Into<String>,
        thickness: f64,
        resolution: f64,
        injection: Injection,
    ) -> Result<()> {
        ensure_positive("layer thickness", thickness)?;
        ensure_positive("layer resolution", resolution)?;
        let mut layer = Layer::new(name, thickness, resolution);
        validate_injection(&layer, &injection)?;
        debug!(
            layer = %layer.name,
            injection = %injection.name,
            position = injection.position,
            "appending layer with injection"
        );
        layer.injection = Some(injection);
        self.layers.push(layer);
        Ok(())
    }

    /// Layers in stacking order, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sum of all layer thicknesses.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.layers.iter().map(|layer| layer.thickness).sum()
    }

    /// Number of layers that own an injection.
    #[must_use]
    pub fn injection_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.has_injection()).count()
    }

    /// The first injection in the stack with its owning layer's position.
    #[must_use]
    pub fn injection(&self) -> Option<(usize, &Injection)> {
        self.layers
            .iter()
            .enumerate()
            .find_map(|(i, layer)| layer.injection.as_ref().map(|inj| (i, inj)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, StrataError};
    use approx::assert_relative_eq;

    #[test]
    fn total_height_sums_layers() {
        let mut stack = LayerStack::new();
        stack.add_layer("Subcutis", 2.0, 0.25).unwrap();
        stack.add_layer("Dermis", 1.5, 0.25).unwrap();
        stack.add_layer("Epidermis", 0.5, 0.1).unwrap();
        assert_eq!(stack.len(), 3);
        assert_relative_eq!(stack.total_height(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn layers_keep_append_order() {
        let mut stack = LayerStack::new();
        stack.add_layer("bottom", 1.0, 0.5).unwrap();
        stack.add_layer("top", 1.0, 0.5).unwrap();
        let names: Vec<_> = stack.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["bottom", "top"]);
    }

    #[test]
    fn rejected_injection_leaves_stack_unmodified() {
        let mut stack = LayerStack::new();
        stack.add_layer("Epidermis", 0.5, 0.1).unwrap();
        let before = stack.clone();

        let result = stack.add_layer_with_injection(
            "Dermis",
            1.0,
            0.1,
            Injection::new("Depot", 0.5, 0.1, 0.6),
        );

        assert!(matches!(
            result,
            Err(StrataError::Configuration(ConfigurationError::InjectionExceedsLayer { .. }))
        ));
        assert_eq!(stack, before);
    }

    #[test]
    fn second_injection_is_accepted_until_generation() {
        let mut stack = LayerStack::new();
        stack
            .add_layer_with_injection("A", 1.0, 0.1, Injection::new("D1", 0.2, 0.1, 0.2))
            .unwrap();
        stack
            .add_layer_with_injection("B", 1.0, 0.1, Injection::new("D2", 0.2, 0.1, 0.2))
            .unwrap();
        assert_eq!(stack.injection_count(), 2);
        assert_eq!(stack.injection().map(|(i, inj)| (i, inj.name.as_str())), Some((0, "D1")));
    }

    #[test]
    fn non_positive_thickness_is_rejected() {
        let mut stack = LayerStack::new();
        assert!(stack.add_layer("bad", 0.0, 0.1).is_err());
        assert!(stack.add_layer("bad", 1.0, -0.1).is_err());
        assert!(stack.is_empty());
    }
}
