/// A cylindrical depot embedded inside a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    /// Name of the depot subset.
    pub name: String,
    /// Axial extent of the depot.
    pub thickness: f64,
    /// Extrusion step length used inside the depot band.
    pub resolution: f64,
    /// Offset of the depot's lower face, relative to the layer thickness.
    pub position: f64,
    /// Split the depot into a labelled boundary and a labelled interior.
    pub with_inner_boundary: bool,
}

impl Injection {
    /// Creates an injection without a separate inner boundary.
    #[must_use]
    pub fn new(name: impl Into<String>, thickness: f64, resolution: f64, position: f64) -> Self {
        Self {
            name: name.into(),
            thickness,
            resolution,
            position,
            with_inner_boundary: false,
        }
    }

    /// Enables or disables the boundary/interior split for the depot.
    #[must_use]
    pub fn with_inner_boundary(mut self, enabled: bool) -> Self {
        self.with_inner_boundary = enabled;
        self
    }

    /// Material between the layer's lower face and the depot.
    #[must_use]
    pub fn below(&self, layer_thickness: f64) -> f64 {
        layer_thickness * self.position
    }

    /// Material between the depot's upper face and the layer's upper face.
    #[must_use]
    pub fn above(&self, layer_thickness: f64) -> f64 {
        layer_thickness - self.thickness - layer_thickness * self.position
    }
}

/// A horizontal slab of material in the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub thickness: f64,
    /// Extrusion step length for this layer.
    pub resolution: f64,
    pub injection: Option<Injection>,
}

impl Layer {
    #[must_use]
    pub fn new(name: impl Into<String>, thickness: f64, resolution: f64) -> Self {
        Self {
            name: name.into(),
            thickness,
            resolution,
            injection: None,
        }
    }

    #[must_use]
    pub fn has_injection(&self) -> bool {
        self.injection.is_some()
    }
}
