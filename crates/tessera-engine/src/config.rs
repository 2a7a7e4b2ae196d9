//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{EngineError, Result};

/// How part surface area is estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaMethod {
    /// Sum of triangle areas in world space.
    #[default]
    Triangulated,
    /// Surface of the part's world-space bounding box.
    BoundingBox,
}

/// What to do when a saved selection names a material the catalog lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Drop the selection, log it, and keep loading.
    #[default]
    DropAndWarn,
    /// Fail the whole restore.
    Strict,
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum hit distance, and the window within which two hits tie.
    pub pick_epsilon: f64,
    /// Surface area estimate used for pricing.
    pub area_method: AreaMethod,
    /// Handling of unresolvable selections on restore.
    pub record_policy: RecordPolicy,
    /// ISO currency code for formatted prices.
    pub currency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pick_epsilon: 1e-9,
            area_method: AreaMethod::Triangulated,
            record_policy: RecordPolicy::DropAndWarn,
            currency: "USD".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse from TOML; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.pick_epsilon.is_finite() || self.pick_epsilon < 0.0 {
            return Err(EngineError::Config(format!(
                "pick_epsilon must be a non-negative number, got {}",
                self.pick_epsilon
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(EngineError::Config("currency must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            pick_epsilon = 1e-6
            area_method = "bounding_box"
            record_policy = "strict"
            currency = "EUR"
            "#,
        )
        .unwrap();
        assert_eq!(config.pick_epsilon, 1e-6);
        assert_eq!(config.area_method, AreaMethod::BoundingBox);
        assert_eq!(config.record_policy, RecordPolicy::Strict);
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn test_reject_bad_values() {
        assert!(matches!(
            EngineConfig::from_toml_str("pick_epsilon = -1.0"),
            Err(EngineError::Config(_))
        ));
        assert!(EngineConfig::from_toml_str("currency = \"  \"").is_err());
        assert!(EngineConfig::from_toml_str("area_method = \"voxel\"").is_err());
    }
}
