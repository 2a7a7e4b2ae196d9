//! Error types for the engine.

use tessera_ir::{IrError, MaterialId, ModelRef, PartId, Selection};
use tessera_pick::PickError;
use thiserror::Error;

/// Errors that can occur in the material-assignment engine.
///
/// Problems confined to a single entry (one override, one triangle) are
/// reported inside results instead; these variants are for failures the
/// caller has to handle.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A part expected to exist is gone.
    #[error("part not found: {0}")]
    NotFound(PartId),

    /// Part identity is not in the current scene.
    #[error("unknown part: {0}")]
    UnknownPart(PartId),

    /// Material identity is not in the catalog.
    #[error("unknown material: {0}")]
    UnknownMaterial(MaterialId),

    /// The catalog lists the same material twice.
    #[error("duplicate material in catalog: {0}")]
    DuplicateMaterial(MaterialId),

    /// A loaded record references materials the catalog cannot resolve.
    #[error("corrupt project record: {} unresolvable selection(s)", .missing.len())]
    CorruptRecord {
        /// Selections whose material is missing.
        missing: Vec<Selection>,
    },

    /// A record could not be written as requested.
    #[error("invalid project record: {0}")]
    InvalidRecord(String),

    /// A record was restored onto a different model than it was saved for.
    #[error("record belongs to {found}, but {expected} is loaded")]
    ModelMismatch {
        /// Currently loaded model.
        expected: ModelRef,
        /// Model named by the record.
        found: ModelRef,
    },

    /// An operation needs a loaded model.
    #[error("no model loaded")]
    NoModel,

    /// Pick ray or camera problem.
    #[error("pick failed: {0}")]
    Pick(#[from] PickError),

    /// IR validation or decoding failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Configuration could not be read.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error reading configuration or catalogs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
