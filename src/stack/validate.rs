use crate::config::GenerationParams;
use crate::error::ConfigurationError;
use crate::math::{planar_distance, RegularPolygon, TOLERANCE};

use super::{Injection, Layer, LayerStack};

/// Largest angle bound the cap refinement is asked to satisfy.
const MAX_TRIANGLE_ANGLE_DEG: f64 = 45.0;

pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigurationError::NonPositive { parameter, value });
    }
    Ok(())
}

/// Checks that `injection` fits inside `layer`.
///
/// The depot must be no thicker than the layer, its relative position must
/// lie in the open interval (0, 1), and depot plus offset must end inside the
/// layer. An overshoot of up to [`TOLERANCE`] is accepted as rounding noise;
/// the planner clamps the depot top to the layer top.
///
/// # Errors
///
/// Returns the first violated [`ConfigurationError`].
pub fn validate_injection(layer: &Layer, injection: &Injection) -> Result<(), ConfigurationError> {
    ensure_positive("injection thickness", injection.thickness)?;
    ensure_positive("injection resolution", injection.resolution)?;
    if injection.position.is_nan() || injection.position <= 0.0 || injection.position >= 1.0 {
        return Err(ConfigurationError::OutOfRange {
            parameter: "injection position",
            value: injection.position,
            min: 0.0,
            max: 1.0,
        });
    }
    if injection.thickness > layer.thickness {
        return Err(ConfigurationError::InjectionThickerThanLayer {
            layer: layer.name.clone(),
            layer_thickness: layer.thickness,
            injection: injection.name.clone(),
            injection_thickness: injection.thickness,
        });
    }
    let top = layer.thickness * injection.position + injection.thickness;
    if top - layer.thickness > TOLERANCE {
        return Err(ConfigurationError::InjectionExceedsLayer {
            layer: layer.name.clone(),
            layer_thickness: layer.thickness,
            injection: injection.name.clone(),
            top,
        });
    }
    Ok(())
}

/// Checks a stack and its generation parameters before any mesh is built.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] for an empty stack, non-positive radii,
/// profiles with fewer than three vertices, quality targets out of range,
/// an injection profile that leaves the main profile, or more than one
/// injection in the stack. Profiles are compared as the polygons they are
/// meshed with, not as circles.
pub fn validate_generation(stack: &LayerStack, params: &GenerationParams) -> Result<(), ConfigurationError> {
    if stack.is_empty() {
        return Err(ConfigurationError::EmptyStack);
    }

    let main = &params.main;
    let injection = &params.injection;
    if main.radius.is_nan() || main.radius <= 0.0 {
        return Err(ConfigurationError::InvalidRadius { which: "main", value: main.radius });
    }
    if injection.radius.is_nan() || injection.radius <= 0.0 {
        return Err(ConfigurationError::InvalidRadius {
            which: "injection",
            value: injection.radius,
        });
    }
    if main.vertex_count < 3 {
        return Err(ConfigurationError::TooFewVertices { which: "main", count: main.vertex_count });
    }

    let count = stack.injection_count();
    if count > 1 {
        return Err(ConfigurationError::MultipleInjections { count });
    }

    let angle = params.min_triangle_angle_deg;
    if angle.is_nan() || angle <= 0.0 || angle > MAX_TRIANGLE_ANGLE_DEG {
        return Err(ConfigurationError::OutOfRange {
            parameter: "triangle angle",
            value: angle,
            min: 0.0,
            max: MAX_TRIANGLE_ANGLE_DEG,
        });
    }
    ensure_positive("tetrahedral quality", params.tetrahedral_quality)?;

    if count == 1 {
        if injection.vertex_count < 3 {
            return Err(ConfigurationError::TooFewVertices {
                which: "injection",
                count: injection.vertex_count,
            });
        }
        let offset = planar_distance(&main.center_point(), &injection.center_point());
        let wall = RegularPolygon::new(main.center_point(), main.radius, main.vertex_count);
        let depot = RegularPolygon::new(injection.center_point(), injection.radius, injection.vertex_count);
        let fits = offset + injection.radius < main.radius - TOLERANCE
            && depot.vertices().iter().all(|v| wall.contains(v, -TOLERANCE));
        if !fits {
            return Err(ConfigurationError::InjectionOutsideMainCylinder {
                offset,
                radius: injection.radius,
                main_radius: main.radius,
            });
        }
    }
    Ok(())
}
