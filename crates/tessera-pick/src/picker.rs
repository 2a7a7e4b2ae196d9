//! Nearest-part resolution.

use tessera_math::{Aabb3, Point3};
use tessera_scene::{Part, PartId, Triangle};
use tracing::debug;

use crate::ray::{intersect_triangle, Ray};

/// The nearest part under a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// Identity of the hit part.
    pub part_id: PartId,
    /// Distance from the ray origin to the hit (the direction is unit length).
    pub hit_distance: f64,
    /// World-space hit point.
    pub point: Point3,
    /// Index of the hit triangle within the part.
    pub triangle_index: usize,
}

/// Counters from one pick, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickStats {
    /// Parts whose bounds the ray crossed.
    pub parts_tested: usize,
    /// Triangles run through the intersection test.
    pub triangles_tested: usize,
    /// Triangles skipped for non-finite coordinates.
    pub triangles_skipped: usize,
}

#[derive(Debug, Clone)]
struct PartEntry {
    id: PartId,
    bounds: Aabb3,
    triangles: Vec<Triangle>,
}

/// World-space triangles and bounds for every part, in scene order.
///
/// Built once per loaded model; parts are immutable while it lives.
#[derive(Debug, Clone, Default)]
pub struct PickIndex {
    entries: Vec<PartEntry>,
}

impl PickIndex {
    /// Transform every part's triangles into world space.
    pub fn build(parts: &[Part]) -> Self {
        let entries = parts
            .iter()
            .map(|part| {
                let triangles: Vec<Triangle> = part.world_triangles().collect();
                let mut bounds = Aabb3::empty();
                for tri in triangles.iter().filter(|t| t.is_finite()) {
                    bounds.include_point(&tri.a);
                    bounds.include_point(&tri.b);
                    bounds.include_point(&tri.c);
                }
                PartEntry {
                    id: part.id.clone(),
                    bounds,
                    triangles,
                }
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed parts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest hit along `ray`, or `None` for a miss.
    ///
    /// Hits closer than `epsilon` are ignored. When two parts hit within
    /// `epsilon` of each other the one earlier in scene order wins.
    pub fn pick(&self, ray: &Ray, epsilon: f64) -> Option<PickResult> {
        self.pick_with_stats(ray, epsilon).0
    }

    /// Like [`PickIndex::pick`], also returning counters.
    pub fn pick_with_stats(&self, ray: &Ray, epsilon: f64) -> (Option<PickResult>, PickStats) {
        let mut stats = PickStats::default();
        let mut best: Option<(usize, usize, f64)> = None;

        for (part_idx, entry) in self.entries.iter().enumerate() {
            let Some((t_enter, _)) = ray.intersect_aabb(&entry.bounds) else {
                continue;
            };
            if let Some((_, _, best_t)) = best {
                if t_enter > best_t + epsilon {
                    continue;
                }
            }
            stats.parts_tested += 1;

            let mut part_best: Option<(usize, f64)> = None;
            for (tri_idx, tri) in entry.triangles.iter().enumerate() {
                if !tri.is_finite() {
                    stats.triangles_skipped += 1;
                    continue;
                }
                stats.triangles_tested += 1;
                if let Some(t) = intersect_triangle(ray, tri, epsilon) {
                    if part_best.map_or(true, |(_, bt)| t < bt) {
                        part_best = Some((tri_idx, t));
                    }
                }
            }

            if let Some((tri_idx, t)) = part_best {
                let closer = match best {
                    None => true,
                    Some((_, _, best_t)) => t < best_t - epsilon,
                };
                if closer {
                    best = Some((part_idx, tri_idx, t));
                }
            }
        }

        if stats.triangles_skipped > 0 {
            debug!(skipped = stats.triangles_skipped, "skipped non-finite triangles while picking");
        }

        let result = best.map(|(part_idx, triangle_index, t)| PickResult {
            part_id: self.entries[part_idx].id.clone(),
            hit_distance: t,
            point: ray.at(t),
            triangle_index,
        });
        (result, stats)
    }
}

/// One-shot pick over `parts` without keeping an index.
pub fn pick(ray: &Ray, parts: &[Part], epsilon: f64) -> Option<PickResult> {
    PickIndex::build(parts).pick(ray, epsilon)
}
