//! Error types for picking.

use thiserror::Error;

/// Errors that can occur while building a pick ray.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PickError {
    /// Ray direction is zero-length or not finite.
    #[error("ray direction is degenerate")]
    DegenerateDirection,

    /// Camera parameters do not produce an invertible view-projection.
    #[error("camera is not invertible: {0}")]
    InvalidCamera(String),
}

/// Result type for picking operations.
pub type Result<T> = std::result::Result<T, PickError>;
