//! Flat scene description handed over by a model loader.
//!
//! Loaders (IFC, glTF, ...) resolve their node hierarchies into this flat
//! list of leaf parts before the engine sees them.

use serde::{Deserialize, Serialize};

use crate::{ModelRef, PartId, Result};

/// Position, rotation and scale of a part, applied scale → rotate → translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDef {
    /// Translation.
    #[serde(default)]
    pub position: [f64; 3],
    /// Euler angles in degrees (applied X, then Y, then Z).
    #[serde(default)]
    pub rotation: [f64; 3],
    /// Per-axis scale.
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for TransformDef {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
        }
    }
}

/// One leaf part with local-space triangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    /// Stable identity for the lifetime of the loaded model.
    pub id: PartId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Triangles as three `[x, y, z]` corners each.
    pub triangles: Vec<[[f64; 3]; 3]>,
    /// Local → world transform.
    #[serde(default)]
    pub transform: TransformDef,
}

/// A loaded model, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Where the model came from.
    pub model_ref: ModelRef,
    /// Leaf parts in loader order.
    pub parts: Vec<PartDef>,
}

impl SceneFile {
    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults_to_identity() {
        let json = r#"{
            "model_ref": "file://shed.glb",
            "parts": [
                { "id": "roof", "triangles": [[[0,0,0],[1,0,0],[0,1,0]]] }
            ]
        }"#;
        let scene = SceneFile::from_json(json).unwrap();
        assert_eq!(scene.parts.len(), 1);
        assert_eq!(scene.parts[0].transform, TransformDef::default());
        assert_eq!(scene.parts[0].transform.scale, [1.0, 1.0, 1.0]);
        assert!(scene.parts[0].name.is_none());
    }

    #[test]
    fn test_partial_transform_keeps_unit_scale() {
        let def: TransformDef = serde_json::from_str(r#"{"position":[1,2,3]}"#).unwrap();
        assert_eq!(def.position, [1.0, 2.0, 3.0]);
        assert_eq!(def.scale, [1.0, 1.0, 1.0]);
    }
}
