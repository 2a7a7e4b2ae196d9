//! Per-part cost and grand total.

use serde::{Deserialize, Serialize};
use tessera_ir::{MaterialId, PartId};
use tracing::warn;

use crate::catalog::Catalog;
use crate::overrides::OverrideMapping;

/// Cost of one override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    /// Priced part.
    pub part_id: PartId,
    /// Material applied to it.
    pub material_id: MaterialId,
    /// Catalog display name of the material.
    pub material_name: String,
    /// Surface area in m².
    pub area: f64,
    /// Catalog price per m².
    pub unit_price: f64,
    /// `area * unit_price`.
    pub subtotal: f64,
}

/// An override left out of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Part of the skipped override.
    pub part_id: PartId,
    /// Material that could not be priced.
    pub material_id: MaterialId,
    /// Human-readable cause.
    pub reason: String,
}

/// Derived pricing of an override mapping. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    /// Priced overrides in mapping order.
    pub lines: Vec<PriceLine>,
    /// Sum of every line's subtotal.
    pub total: f64,
    /// Overrides excluded from the total.
    pub skipped: Vec<SkippedEntry>,
}

impl PriceResult {
    /// True if every override was priced.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Line for `part`, if it was priced.
    pub fn line(&self, part: &PartId) -> Option<&PriceLine> {
        self.lines.iter().find(|l| &l.part_id == part)
    }
}

/// Price every override in `mapping`.
///
/// Unit prices come from `catalog`, not from the material stored in the
/// override, so a repriced catalog reprices existing projects. Materials
/// the catalog cannot resolve are reported in `skipped`. The total is
/// summed in mapping order.
pub fn compute_total(
    mapping: &OverrideMapping,
    mut area_of: impl FnMut(&PartId) -> f64,
    catalog: &dyn Catalog,
) -> PriceResult {
    let mut result = PriceResult::default();
    for (part_id, spec) in mapping.iter() {
        let material = match catalog.resolve(&spec.id) {
            Ok(m) => m,
            Err(e) => {
                warn!(part = %part_id, material = %spec.id, "skipping override: {e}");
                result.skipped.push(SkippedEntry {
                    part_id: part_id.clone(),
                    material_id: spec.id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let area = area_of(part_id);
        let subtotal = area * material.unit_price;
        result.total += subtotal;
        result.lines.push(PriceLine {
            part_id: part_id.clone(),
            material_id: material.id,
            material_name: material.name,
            area,
            unit_price: material.unit_price,
            subtotal,
        });
    }
    result
}

/// Render `amount` with two decimals and thousands separators.
///
/// USD, EUR and GBP use their symbol; any other code is used as a prefix.
pub fn format_price(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let prefix = match code.as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        _ => format!("{code} "),
    };

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{prefix}{grouped}.{cents}")
}
