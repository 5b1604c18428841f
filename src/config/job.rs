use serde::Deserialize;

use crate::error::{ConfigurationError, Result};
use crate::stack::{Injection, LayerStack};

use super::GenerationParams;

/// A complete generation request, usually read from a TOML file.
///
/// ```toml
/// [params.main]
/// radius = 1.0
/// vertex_count = 12
///
/// [[layers]]
/// name = "Subcutis"
/// thickness = 2.0
/// resolution = 0.25
///
/// [layers.injection]
/// name = "Depot"
/// thickness = 0.3
/// resolution = 0.1
/// position = 0.4
/// with_inner_boundary = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationJob {
    #[serde(default)]
    pub params: GenerationParams,
    /// Layers bottom to top.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// One `[[layers]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub thickness: f64,
    pub resolution: f64,
    pub injection: Option<InjectionSpec>,
}

/// The optional `[layers.injection]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct InjectionSpec {
    pub name: String,
    pub thickness: f64,
    pub resolution: f64,
    pub position: f64,
    #[serde(default)]
    pub with_inner_boundary: bool,
}

impl GenerationJob {
    /// Parses a job from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidJob`] if the text is not valid TOML
    /// or does not match the job layout.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigurationError::InvalidJob(e.to_string()).into())
    }

    /// Builds the layer stack through the regular append operations.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] raised while appending layers.
    pub fn into_parts(self) -> Result<(LayerStack, GenerationParams)> {
        let mut stack = LayerStack::new();
        for spec in self.layers {
            match spec.injection {
                None => stack.add_layer(spec.name, spec.thickness, spec.resolution)?,
                Some(inj) => {
                    let injection = Injection::new(inj.name, inj.thickness, inj.resolution, inj.position)
                        .with_inner_boundary(inj.with_inner_boundary);
                    stack.add_layer_with_injection(spec.name, spec.thickness, spec.resolution, injection)?;
                }
            }
        }
        Ok((stack, self.params))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StrataError;

    const JOB: &str = r#"
        [params]
        min_triangle_angle_deg = 25.0

        [params.main]
        radius = 2.0
        vertex_count = 16

        [params.injection]
        center = [0.2, 0.0, 0.0]
        radius = 0.4

        [[layers]]
        name = "Subcutis"
        thickness = 2.0
        resolution = 0.25

        [layers.injection]
        name = "Depot"
        thickness = 0.3
        resolution = 0.1
        position = 0.4
        with_inner_boundary = true

        [[layers]]
        name = "Epidermis"
        thickness = 0.5
        resolution = 0.1
    "#;

    #[test]
    fn parses_layers_and_params() {
        let (stack, params) = GenerationJob::from_toml_str(JOB).unwrap().into_parts().unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.injection_count(), 1);
        let (layer, injection) = stack.injection().unwrap();
        assert_eq!(layer, 0);
        assert!(injection.with_inner_boundary);
        assert!((params.main.radius - 2.0).abs() < f64::EPSILON);
        assert_eq!(params.main.vertex_count, 16);
        // unspecified fields fall back to defaults
        assert_eq!(params.injection.vertex_count, 10);
        assert!((params.min_triangle_angle_deg - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = GenerationJob::from_toml_str("[[layers]]\nname = 3").unwrap_err();
        assert!(matches!(
            err,
            StrataError::Configuration(ConfigurationError::InvalidJob(_))
        ));
    }

    #[test]
    fn invalid_injection_in_file_is_rejected() {
        let text = r#"
            [[layers]]
            name = "Dermis"
            thickness = 1.0
            resolution = 0.1
            [layers.injection]
            name = "Depot"
            thickness = 0.5
            resolution = 0.1
            position = 0.6
        "#;
        let err = GenerationJob::from_toml_str(text).unwrap().into_parts().unwrap_err();
        assert!(matches!(
            err,
            StrataError::Configuration(ConfigurationError::InjectionExceedsLayer { .. })
        ));
    }
}
