/// Viewer configuration with defaults matching the stock ribbon scene
use serde::Deserialize;

use crate::error::ConfigError;
use crate::lighting::Material;
use crate::projection::OrthoBox;
use crate::surface::{Surface, MAX_VERTICES};

/// Coefficients and parameter ranges of the ribbon surface.
///
/// Angles are in degrees. `u` runs over `[0, u_end)` and `v` over
/// `[v_start, v_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    pub a: f64,
    pub b: f64,
    pub n: f64,
    pub scale: f64,
    pub u_end: f64,
    pub v_start: f64,
    pub v_end: f64,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            n: 1.0,
            scale: 3.5,
            u_end: 360.0,
            v_start: -1.0,
            v_end: 50.0,
        }
    }
}

/// Parameter step sizes for the two sampling modes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub coarse_step: f64,
    pub detailed_step: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            coarse_step: 1.0,
            detailed_step: 0.2,
        }
    }
}

impl SamplingConfig {
    pub fn step(&self, detailed: bool) -> f64 {
        if detailed {
            self.detailed_step
        } else {
            self.coarse_step
        }
    }
}

/// Fixed placement of the surface in the scene
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub projection: OrthoBox,
    /// Axis of the recentring rotation applied after the view rotation
    pub recenter_axis: [f32; 3],
    /// Recentring angle in radians
    pub recenter_angle: f32,
    pub translation: [f32; 3],
    pub clear_color: [f32; 4],
    /// Distance between the trackball eye and the origin
    pub view_distance: f32,
    pub light_position: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            projection: OrthoBox::default(),
            recenter_axis: [0.707, 0.707, 0.0],
            recenter_angle: 0.7,
            translation: [0.0, 0.0, -10.0],
            clear_color: [0.0, 0.0, 0.0, 1.0],
            view_distance: 0.0,
            light_position: [0.0, 10.0, 10.0],
        }
    }
}

/// Everything a render session needs besides the graphics context
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub surface: SurfaceParams,
    pub sampling: SamplingConfig,
    pub scene: SceneConfig,
    pub material: Material,
    /// Image used by the textured variant
    pub texture_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceParams::default(),
            sampling: SamplingConfig::default(),
            scene: SceneConfig::default(),
            material: Material::default(),
            texture_url: "texture.png".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, step) in [
            ("coarse_step", self.sampling.coarse_step),
            ("detailed_step", self.sampling.detailed_step),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {step}"
                )));
            }
        }

        let surface = &self.surface;
        if !(surface.u_end > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "u range [0, {}) is empty",
                surface.u_end
            )));
        }
        if !(surface.v_end > surface.v_start) {
            return Err(ConfigError::Invalid(format!(
                "v range [{}, {}) is empty",
                surface.v_start, surface.v_end
            )));
        }

        // Texture t coordinates divide by v_end
        if !(surface.v_end > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "v_end must be positive, got {}",
                surface.v_end
            )));
        }

        let sampler = Surface::new(*surface);
        for step in [self.sampling.coarse_step, self.sampling.detailed_step] {
            if sampler.strip_vertex_count(step).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "step {step} would sample more than {MAX_VERTICES} vertices"
                )));
            }
        }

        let [x, y, z] = self.scene.recenter_axis;
        if x * x + y * y + z * z < 1e-12 {
            return Err(ConfigError::Invalid(
                "recenter_axis must not be zero".to_string(),
            ));
        }

        if !self.scene.projection.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "degenerate projection box {:?}",
                self.scene.projection
            )));
        }

        Ok(())
    }
}
