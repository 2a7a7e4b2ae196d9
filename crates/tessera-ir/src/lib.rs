#![warn(missing_docs)]

//! Data model shared between the tessera engine and its collaborators.
//!
//! Everything here is plain serde data: the material catalog entries the
//! engine reads, the project records the persistence layer stores, and the
//! scene file a loader hands over. No geometry processing happens here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod material;
pub mod project;
pub mod scene;

pub use material::{Color, MaterialCategory, MaterialSpec, Shading, DEFAULT_UNIT};
pub use project::{ProjectRecord, ProjectSummary, Selection};
pub use scene::{PartDef, SceneFile, TransformDef};

/// Errors raised while validating or decoding IR values.
#[derive(Error, Debug)]
pub enum IrError {
    /// Color string is not `#rgb` or `#rrggbb`.
    #[error("invalid hex color: {0:?}")]
    InvalidColor(String),

    /// A material was given a negative unit price.
    #[error("material {id} has negative unit price {price}")]
    NegativePrice {
        /// Offending material.
        id: MaterialId,
        /// The rejected price.
        price: f64,
    },

    /// JSON decode/encode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decode failure.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identity of a pickable part, supplied by the scene loader.
    PartId
);

string_id!(
    /// Catalog key of a material.
    MaterialId
);

string_id!(
    /// Reference to the model a project was built on (usually a URL).
    ModelRef
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let id = PartId::from("wall-01");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""wall-01""#);
        let back: PartId = serde_json::from_str(r#""wall-01""#).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "wall-01");
    }

    #[test]
    fn test_ids_order_by_string() {
        let mut ids = vec![MaterialId::from("oak"), MaterialId::from("brass")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "brass");
    }
}
