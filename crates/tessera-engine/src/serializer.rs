//! Conversion between override mappings and persisted project records.

use chrono::{DateTime, Utc};
use tessera_ir::{ModelRef, ProjectRecord, Selection};
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::RecordPolicy;
use crate::overrides::OverrideMapping;
use crate::{EngineError, Result};

/// Metadata written alongside the selections.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMeta {
    /// User-facing project name; must not be blank.
    pub project_name: String,
    /// Grand total at save time.
    pub total_price: f64,
    /// Save timestamp.
    pub saved_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Metadata stamped with the current time.
    pub fn now(project_name: impl Into<String>, total_price: f64) -> Self {
        Self {
            project_name: project_name.into(),
            total_price,
            saved_at: Utc::now(),
        }
    }
}

/// Build a new record from `mapping`.
///
/// Selections follow the mapping's insertion order.
pub fn to_record(mapping: &OverrideMapping, model_ref: &ModelRef, meta: RecordMeta) -> Result<ProjectRecord> {
    let project_name = meta.project_name.trim();
    if project_name.is_empty() {
        return Err(EngineError::InvalidRecord("project name is blank".into()));
    }
    let selections = mapping
        .iter()
        .map(|(part, spec)| Selection::new(part.clone(), spec.id.clone()))
        .collect();
    Ok(ProjectRecord {
        project_name: project_name.to_string(),
        model_ref: model_ref.clone(),
        selections,
        total_price: meta.total_price,
        created_at: meta.saved_at,
        updated_at: meta.saved_at,
    })
}

/// Replace `existing` wholesale, keeping only its creation time.
pub fn overwrite(
    existing: &ProjectRecord,
    mapping: &OverrideMapping,
    model_ref: &ModelRef,
    meta: RecordMeta,
) -> Result<ProjectRecord> {
    let mut record = to_record(mapping, model_ref, meta)?;
    record.created_at = existing.created_at;
    Ok(record)
}

/// Result of reading a record back.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredOverrides {
    /// Bindings whose material resolved.
    pub mapping: OverrideMapping,
    /// Selections left out because the catalog no longer has the material.
    pub dropped: Vec<Selection>,
}

/// Rebuild an override mapping from `record`, resolving materials in
/// `catalog`.
///
/// Under [`RecordPolicy::Strict`] any unresolvable selection fails the
/// whole restore with [`EngineError::CorruptRecord`]; otherwise such
/// selections are dropped and logged. A part listed twice keeps its last
/// material.
pub fn from_record(
    record: &ProjectRecord,
    catalog: &dyn Catalog,
    policy: RecordPolicy,
) -> Result<RestoredOverrides> {
    let mut entries = Vec::with_capacity(record.selections.len());
    let mut dropped = Vec::new();
    for selection in &record.selections {
        match catalog.resolve(&selection.material_id) {
            Ok(spec) => entries.push((selection.part_id.clone(), spec)),
            Err(_) => dropped.push(selection.clone()),
        }
    }

    if !dropped.is_empty() {
        if policy == RecordPolicy::Strict {
            return Err(EngineError::CorruptRecord { missing: dropped });
        }
        for selection in &dropped {
            warn!(
                project = %record.project_name,
                part = %selection.part_id,
                material = %selection.material_id,
                "dropping selection with unknown material"
            );
        }
    }

    Ok(RestoredOverrides {
        mapping: entries.into_iter().collect(),
        dropped,
    })
}
