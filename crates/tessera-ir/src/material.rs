//! Material catalog entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{IrError, MaterialId, Result};

/// Unit label used when a catalog entry does not specify one.
pub const DEFAULT_UNIT: &str = "USD/m²";

/// An sRGB color, written as `#rrggbb` in catalogs and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0xcc, 0xcc, 0xcc)
    }
}

impl FromStr for Color {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IrError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = IrError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Broad finish family, used for catalog grouping and default shading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    /// Timber finishes.
    Wood,
    /// Metal cladding and trims.
    Metal,
    /// Glazing.
    Glass,
    /// Plastics and composites.
    Plastic,
    /// Anything else.
    #[default]
    Other,
}

/// Physically based shading parameters for previewing a finish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shading {
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metalness: f64,
    /// Roughness factor (0.0 = mirror, 1.0 = diffuse).
    pub roughness: f64,
    /// Opacity (1.0 = opaque).
    pub opacity: f64,
}

impl Shading {
    /// Default preview shading for a category.
    pub fn for_category(category: MaterialCategory) -> Self {
        match category {
            MaterialCategory::Metal => Self {
                metalness: 0.8,
                roughness: 0.7,
                opacity: 1.0,
            },
            MaterialCategory::Glass => Self {
                metalness: 0.1,
                roughness: 0.1,
                opacity: 0.6,
            },
            _ => Self {
                metalness: 0.1,
                roughness: 0.7,
                opacity: 1.0,
            },
        }
    }

    /// True if the finish needs alpha blending.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_active() -> bool {
    true
}

/// A finish material as published by the catalog.
///
/// The engine treats this as an immutable value and copies it into
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Catalog key.
    pub id: MaterialId,
    /// Display name.
    pub name: String,
    /// Preview color.
    #[serde(default)]
    pub color: Color,
    /// Price per square metre. Never negative.
    pub unit_price: f64,
    /// Unit label for display.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Finish family.
    #[serde(default)]
    pub category: MaterialCategory,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Texture served by the catalog, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_url: Option<String>,
    /// Explicit shading; falls back to [`Shading::for_category`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shading: Option<Shading>,
    /// Inactive entries are hidden from pickers but still resolve.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl MaterialSpec {
    /// Create an active material of category `other` with the default color.
    pub fn new(id: impl Into<MaterialId>, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: Color::default(),
            unit_price,
            unit: default_unit(),
            category: MaterialCategory::default(),
            description: None,
            texture_url: None,
            shading: None,
            active: true,
        }
    }

    /// Set the preview color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: MaterialCategory) -> Self {
        self.category = category;
        self
    }

    /// Set explicit shading parameters.
    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    /// Mark the entry inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Reject negative or non-finite prices.
    pub fn validate(&self) -> Result<()> {
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(IrError::NegativePrice {
                id: self.id.clone(),
                price: self.unit_price,
            });
        }
        Ok(())
    }

    /// Shading to preview with: explicit if set, else the category default.
    pub fn effective_shading(&self) -> Shading {
        self.shading
            .unwrap_or_else(|| Shading::for_category(self.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!("#1a2B3c".parse::<Color>().unwrap(), Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!("#fa0".parse::<Color>().unwrap(), Color::rgb(0xff, 0xaa, 0x00));
    }

    #[test]
    fn test_reject_bad_colors() {
        for bad in ["cccccc", "#cccc", "#ggg", "#12345z", ""] {
            assert!(bad.parse::<Color>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_material_defaults_from_minimal_json() {
        let spec: MaterialSpec =
            serde_json::from_str(r#"{"id":"oak","name":"Oak","unit_price":42.5}"#).unwrap();
        assert_eq!(spec.color, Color::default());
        assert_eq!(spec.unit, DEFAULT_UNIT);
        assert_eq!(spec.category, MaterialCategory::Other);
        assert!(spec.active);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let spec = MaterialSpec::new("steel", "Steel", 90.0)
            .with_color(Color::rgb(0x88, 0x99, 0xaa))
            .with_category(MaterialCategory::Metal);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains(r##""color":"#8899aa""##));
        assert!(json.contains(r#""category":"metal""#));
        let back: MaterialSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_invalid_color_fails_deserialization() {
        let res: std::result::Result<MaterialSpec, _> = serde_json::from_str(
            r#"{"id":"x","name":"X","unit_price":1.0,"color":"red"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = MaterialSpec::new("cheap", "Cheap", -1.0).validate().unwrap_err();
        assert!(matches!(err, IrError::NegativePrice { .. }));
        assert!(MaterialSpec::new("nan", "NaN", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_category_shading_defaults() {
        let glass = MaterialSpec::new("g", "Glass", 120.0).with_category(MaterialCategory::Glass);
        let shading = glass.effective_shading();
        assert_eq!(shading.roughness, 0.1);
        assert!(shading.is_transparent());

        let metal = MaterialSpec::new("m", "Zinc", 80.0).with_category(MaterialCategory::Metal);
        assert_eq!(metal.effective_shading().metalness, 0.8);

        let custom = Shading { metalness: 0.0, roughness: 0.3, opacity: 1.0 };
        assert_eq!(metal.with_shading(custom).effective_shading(), custom);
    }
}
