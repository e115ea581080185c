/// Error types shared by the core and the rendering backends
use thiserror::Error;

/// Shader compilation or program link failure, carrying the driver log verbatim
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("Error in vertex shader:  {0}")]
    Vertex(String),
    #[error("Error in fragment shader:  {0}")]
    Fragment(String),
    #[error("Link error in program:  {0}")]
    Link(String),
}

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure while setting up a render session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not get a graphics context: {0}")]
    NoContext(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("resource creation failed: {0}")]
    Resource(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_error_keeps_diagnostic() {
        let err = ShaderError::Fragment("0:3: 'foo' : undeclared identifier".to_string());
        assert_eq!(
            err.to_string(),
            "Error in fragment shader:  0:3: 'foo' : undeclared identifier"
        );

        let render: RenderError = err.into();
        assert!(render.to_string().ends_with("undeclared identifier"));
    }
}
