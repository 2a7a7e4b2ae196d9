//! Per-part material overrides with undo/redo.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tessera_ir::{MaterialSpec, PartId};
use tessera_scene::SceneAdapter;
use tracing::debug;

use crate::history::History;
use crate::{EngineError, Result};

/// Immutable view of the override mapping at one point in history.
pub type Snapshot = Arc<OverrideMapping>;

/// Part → material bindings, one per part, in first-assignment order.
///
/// Equality compares bindings, not order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideMapping {
    entries: IndexMap<PartId, MaterialSpec>,
}

impl OverrideMapping {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Material bound to `part`.
    pub fn get(&self, part: &PartId) -> Option<&MaterialSpec> {
        self.entries.get(part)
    }

    /// True if `part` has a binding.
    pub fn contains(&self, part: &PartId) -> bool {
        self.entries.contains_key(part)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartId, &MaterialSpec)> {
        self.entries.iter()
    }

    /// Bound parts in insertion order.
    pub fn part_ids(&self) -> impl Iterator<Item = &PartId> {
        self.entries.keys()
    }

    /// Copy with `part` bound to `spec`.
    ///
    /// Rebinding keeps the part's original position.
    pub fn with_applied(&self, part: PartId, spec: MaterialSpec) -> Self {
        let mut next = self.clone();
        next.entries.insert(part, spec);
        next
    }

    /// Copy without `part`, or `None` if it was not bound.
    pub fn without(&self, part: &PartId) -> Option<Self> {
        if !self.entries.contains_key(part) {
            return None;
        }
        let mut next = self.clone();
        next.entries.shift_remove(part);
        Some(next)
    }
}

impl FromIterator<(PartId, MaterialSpec)> for OverrideMapping {
    fn from_iter<I: IntoIterator<Item = (PartId, MaterialSpec)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The single source of truth for material assignments on one model.
///
/// Every change produces a new snapshot; earlier snapshots are never
/// touched. `revision` increases whenever the current snapshot changes.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    parts: HashSet<PartId>,
    history: History<OverrideMapping>,
    revision: u64,
}

impl OverrideStore {
    /// Fresh store accepting overrides for `parts`.
    pub fn new(parts: impl IntoIterator<Item = PartId>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
            history: History::new(OverrideMapping::new()),
            revision: 0,
        }
    }

    /// Fresh store for every pickable part of `scene`.
    pub fn for_scene(scene: &dyn SceneAdapter) -> Self {
        Self::new(scene.list_parts().iter().map(|p| p.id.clone()))
    }

    /// Bind `spec` to `part`, recording a history entry.
    pub fn apply(&mut self, part: &PartId, spec: MaterialSpec) -> Result<Snapshot> {
        if !self.parts.contains(part) {
            return Err(EngineError::UnknownPart(part.clone()));
        }
        let next = self.current().with_applied(part.clone(), spec);
        debug!(part = %part, "applied material");
        Ok(self.push(next))
    }

    /// Unbind `part`. Returns `None` without touching history if it had
    /// no binding.
    pub fn remove(&mut self, part: &PartId) -> Option<Snapshot> {
        let next = self.current().without(part)?;
        debug!(part = %part, "removed material");
        Some(self.push(next))
    }

    /// Drop all history and start over with `mapping` as the single entry
    /// after the empty initial state. The revision keeps counting.
    ///
    /// Bindings for parts outside the scene are kept as given.
    pub fn reset(&mut self, mapping: OverrideMapping) -> Snapshot {
        self.history = History::new(OverrideMapping::new());
        self.push(mapping)
    }

    /// Current snapshot.
    pub fn current(&self) -> Snapshot {
        self.history.current().clone()
    }

    /// Step back one entry; no-op at the start.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.revision += 1;
        }
        moved
    }

    /// Step forward one entry; no-op at the end.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.revision += 1;
        }
        moved
    }

    /// True if undo would change state.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if redo would change state.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Changes to the current snapshot so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of history entries, including the empty initial one.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True if `part` may receive overrides.
    pub fn accepts(&self, part: &PartId) -> bool {
        self.parts.contains(part)
    }

    fn push(&mut self, mapping: OverrideMapping) -> Snapshot {
        self.revision += 1;
        self.history.push(mapping)
    }
}
