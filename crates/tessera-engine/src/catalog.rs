//! Read-only material catalog.

use indexmap::IndexMap;
use serde::Deserialize;
use tessera_ir::{MaterialCategory, MaterialId, MaterialSpec};

use crate::{EngineError, Result};

/// Source of truth for material definitions.
pub trait Catalog {
    /// Look up a material by key.
    fn resolve(&self, id: &MaterialId) -> Result<MaterialSpec>;

    /// True if `id` resolves.
    fn contains(&self, id: &MaterialId) -> bool {
        self.resolve(id).is_ok()
    }
}

/// A catalog held in memory, in publication order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: IndexMap<MaterialId, MaterialSpec>,
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    material: Vec<MaterialSpec>,
}

impl MemoryCatalog {
    /// Build from specs, validating prices and rejecting repeated keys.
    pub fn new(specs: impl IntoIterator<Item = MaterialSpec>) -> Result<Self> {
        let mut entries = IndexMap::new();
        for spec in specs {
            spec.validate()?;
            if entries.contains_key(&spec.id) {
                return Err(EngineError::DuplicateMaterial(spec.id));
            }
            entries.insert(spec.id.clone(), spec);
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of materials.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<MaterialSpec> =
            serde_json::from_str(json).map_err(tessera_ir::IrError::from)?;
        Self::new(specs)
    }

    /// Parse TOML with one `[[material]]` table per entry.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: TomlCatalog = toml::from_str(text).map_err(tessera_ir::IrError::from)?;
        Self::new(file.material)
    }

    /// Number of entries, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow an entry.
    pub fn get(&self, id: &MaterialId) -> Option<&MaterialSpec> {
        self.entries.get(id)
    }

    /// Active entries sorted by category, then name.
    pub fn active(&self) -> Vec<&MaterialSpec> {
        let mut list: Vec<_> = self.entries.values().filter(|m| m.active).collect();
        list.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        list
    }

    /// Active entries of one category, sorted by name.
    pub fn by_category(&self, category: MaterialCategory) -> Vec<&MaterialSpec> {
        self.active()
            .into_iter()
            .filter(|m| m.category == category)
            .collect()
    }
}

impl Catalog for MemoryCatalog {
    fn resolve(&self, id: &MaterialId) -> Result<MaterialSpec> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownMaterial(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryCatalog {
        MemoryCatalog::new(vec![
            MaterialSpec::new("walnut", "Walnut", 85.0).with_category(MaterialCategory::Wood),
            MaterialSpec::new("zinc", "Zinc", 120.0).with_category(MaterialCategory::Metal),
            MaterialSpec::new("ash", "Ash", 60.0).with_category(MaterialCategory::Wood),
            MaterialSpec::new("teak", "Teak", 140.0)
                .with_category(MaterialCategory::Wood)
                .deactivated(),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let catalog = sample();
        assert_eq!(catalog.resolve(&"zinc".into()).unwrap().unit_price, 120.0);
        assert!(matches!(
            catalog.resolve(&"marble".into()),
            Err(EngineError::UnknownMaterial(id)) if id.as_str() == "marble"
        ));
    }

    #[test]
    fn test_inactive_entries_still_resolve_but_are_not_listed() {
        let catalog = sample();
        assert!(catalog.contains(&"teak".into()));
        let names: Vec<_> = catalog.active().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Ash", "Walnut", "Zinc"]);
        let woods: Vec<_> = catalog
            .by_category(MaterialCategory::Wood)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(woods, ["ash", "walnut"]);
    }

    #[test]
    fn test_duplicates_and_negative_prices_rejected() {
        let dup = MemoryCatalog::new(vec![
            MaterialSpec::new("oak", "Oak", 1.0),
            MaterialSpec::new("oak", "Oak again", 2.0),
        ]);
        assert!(matches!(dup, Err(EngineError::DuplicateMaterial(_))));

        let neg = MemoryCatalog::new(vec![MaterialSpec::new("x", "X", -5.0)]);
        assert!(matches!(neg, Err(EngineError::Ir(_))));
    }

    #[test]
    fn test_load_from_json_and_toml() {
        let json = r##"[
            {"id": "slate", "name": "Slate", "unit_price": 95.0, "category": "other", "color": "#445566"}
        ]"##;
        let catalog = MemoryCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let toml = r##"
            [[material]]
            id = "glass"
            name = "Float glass"
            unit_price = 210.0
            category = "glass"

            [[material]]
            id = "pine"
            name = "Pine"
            unit_price = 35.5
            category = "wood"
            active = false
        "##;
        let catalog = MemoryCatalog::from_toml(toml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.active().len(), 1);
        assert_eq!(catalog.get(&"pine".into()).unwrap().unit_price, 35.5);
    }
}
