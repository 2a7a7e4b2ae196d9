//! Error types for the scene adapter.

use tessera_ir::PartId;
use thiserror::Error;

/// Errors that can occur when querying a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No pickable part with this identity exists in the scene.
    #[error("part not found: {0}")]
    NotFound(PartId),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
