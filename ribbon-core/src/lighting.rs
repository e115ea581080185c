/// Material and light constants uploaded with every frame
use serde::Deserialize;

/// Phong material of the surface
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// Flat colour for primitives drawn without lighting
    pub color: [f32; 4],
    /// Directional light vector; zero leaves the shader on the positional light
    pub light_vec: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.1, 0.0],
            diffuse: [1.0, 1.0, 0.0],
            specular: [1.0, 1.0, 1.0],
            shininess: 10.0,
            color: [1.0, 1.0, 0.0, 1.0],
            light_vec: [0.0; 3],
        }
    }
}
