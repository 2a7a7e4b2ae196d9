//! Persisted project records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MaterialId, ModelRef, PartId, Result};

/// One saved part → material binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Part the material was applied to.
    pub part_id: PartId,
    /// Catalog key of the applied material.
    pub material_id: MaterialId,
}

impl Selection {
    /// Create a selection.
    pub fn new(part_id: impl Into<PartId>, material_id: impl Into<MaterialId>) -> Self {
        Self {
            part_id: part_id.into(),
            material_id: material_id.into(),
        }
    }
}

/// A saved set of material assignments for one model.
///
/// Written once on save; an update replaces the whole record but keeps
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// User-facing project name.
    pub project_name: String,
    /// Model the selections refer to.
    pub model_ref: ModelRef,
    /// Assignments in override insertion order.
    pub selections: Vec<Selection>,
    /// Grand total at save time.
    pub total_price: f64,
    /// First save.
    pub created_at: DateTime<Utc>,
    /// Most recent save.
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// List-view projection of this record.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            project_name: self.project_name.clone(),
            created_at: self.created_at,
            total_price: self.total_price,
        }
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What a project list shows without loading selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// User-facing project name.
    pub project_name: String,
    /// First save.
    pub created_at: DateTime<Utc>,
    /// Grand total at save time.
    pub total_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ProjectRecord {
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        ProjectRecord {
            project_name: "Lobby refit".into(),
            model_ref: ModelRef::from("https://models.example/lobby.glb"),
            selections: vec![
                Selection::new("floor", "terrazzo"),
                Selection::new("north-wall", "oak"),
            ],
            total_price: 1840.0,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_json_roundtrip_keeps_selection_order() {
        let rec = record();
        let json = rec.to_json().expect("serialize");
        let back = ProjectRecord::from_json(&json).expect("deserialize");
        assert_eq!(back, rec);
        assert_eq!(back.selections[0].part_id.as_str(), "floor");
    }

    #[test]
    fn test_summary_projection() {
        let s = record().summary();
        assert_eq!(s.project_name, "Lobby refit");
        assert_eq!(s.total_price, 1840.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ProjectRecord::from_json("{\"project_name\": 3}").is_err());
    }
}
