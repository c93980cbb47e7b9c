//! Error types for the particle field

use thiserror::Error;

/// Errors raised while configuring or mounting a field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must lie within {min}..{max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{name}: low bound {low} exceeds high bound {high}")]
    InvertedRange {
        name: &'static str,
        low: f32,
        high: f32,
    },

    #[error("spring stiffness {stiffness} with friction {friction} does not settle")]
    Unstable { stiffness: f32, friction: f32 },

    #[error("fixed timestep rate must be positive, got {0}")]
    InvalidRate(f32),

    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Config parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Parse(err.to_string())
    }
}

/// Result type alias using FieldError
pub type Result<T> = std::result::Result<T, FieldError>;
