/// Ribbon Core Library - Surface sampling and the render pipeline
///
/// This library provides the backend-independent part of the ribbon viewer:
/// the parametric surface sampler, the transformation pipeline, the trackball
/// rotator and a render session that drives any `GraphicsContext`.

pub mod config;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod lighting;
pub mod model;
pub mod program;
pub mod projection;
pub mod renderer;
pub mod rotator;
pub mod shaders;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::{RenderConfig, SamplingConfig, SceneConfig, SurfaceParams};
pub use controls::{ControlState, UserPointKey};
pub use error::{ConfigError, RenderError, ShaderError};
pub use geometry::{MeshLayout, SurfaceMesh};
pub use gpu::{DrawCall, GraphicsContext, Primitive, ShaderStage, Uniform};
pub use lighting::Material;
pub use projection::{OrthoBox, Viewport};
pub use renderer::{RenderSession, SurfaceVariant};
pub use rotator::TrackballRotator;
pub use surface::Surface;
pub use transform::{FrameMatrices, Transform};
