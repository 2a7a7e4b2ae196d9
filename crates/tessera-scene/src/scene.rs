//! The scene adapter trait and its in-memory implementation.

use std::collections::HashMap;
use tessera_ir::{ModelRef, PartId, SceneFile};
use tessera_math::Transform;
use tracing::{debug, warn};

use crate::{Part, Result, SceneError, Triangle};

/// Read-only view over a loaded model.
///
/// The part list is stable for the lifetime of one loaded model and every
/// listed part has at least one triangle.
pub trait SceneAdapter {
    /// Model this scene was loaded from.
    fn model_ref(&self) -> &ModelRef;

    /// All pickable parts in loader order.
    fn list_parts(&self) -> &[Part];

    /// Look up a pickable part by identity.
    fn get_part(&self, id: &PartId) -> Result<&Part>;

    /// True if `id` names a pickable part.
    fn contains(&self, id: &PartId) -> bool {
        self.get_part(id).is_ok()
    }
}

/// Scene adapter over parts held in memory.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    model_ref: ModelRef,
    parts: Vec<Part>,
    index: HashMap<PartId, usize>,
}

impl MemoryScene {
    /// Build a scene from loader output.
    ///
    /// Parts without triangles are excluded. A repeated identity keeps the
    /// first occurrence.
    pub fn new(model_ref: impl Into<ModelRef>, parts: impl IntoIterator<Item = Part>) -> Self {
        let mut kept = Vec::new();
        let mut index = HashMap::new();
        for part in parts {
            if part.triangles.is_empty() {
                debug!(part = %part.id, "excluding part with no triangles");
                continue;
            }
            if index.contains_key(&part.id) {
                warn!(part = %part.id, "duplicate part identity, keeping first");
                continue;
            }
            index.insert(part.id.clone(), kept.len());
            kept.push(part);
        }
        Self {
            model_ref: model_ref.into(),
            parts: kept,
            index,
        }
    }

    /// Build a scene from a flattened scene file.
    ///
    /// Parts whose transform has NaN or infinite entries are excluded.
    pub fn from_scene_file(file: &SceneFile) -> Self {
        let mut parts = Vec::with_capacity(file.parts.len());
        for def in &file.parts {
            let t = &def.transform;
            let transform = Transform::from_trs(t.position, t.rotation, t.scale);
            if !transform.is_finite() {
                warn!(part = %def.id, "excluding part with non-finite transform");
                continue;
            }
            parts.push(Part {
                id: def.id.clone(),
                name: def.name.clone(),
                triangles: def.triangles.iter().map(Triangle::from_arrays).collect(),
                transform,
            });
        }
        Self::new(file.model_ref.clone(), parts)
    }

    /// Number of pickable parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True if no part is pickable.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl SceneAdapter for MemoryScene {
    fn model_ref(&self) -> &ModelRef {
        &self.model_ref
    }

    fn list_parts(&self) -> &[Part] {
        &self.parts
    }

    fn get_part(&self, id: &PartId) -> Result<&Part> {
        self.index
            .get(id)
            .map(|&i| &self.parts[i])
            .ok_or_else(|| SceneError::NotFound(id.clone()))
    }
}
