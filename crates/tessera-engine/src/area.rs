//! Surface area estimation with a per-model cache.

use rayon::prelude::*;
use std::collections::HashMap;
use tessera_ir::PartId;
use tessera_math::Tolerance;
use tessera_scene::{Part, SceneAdapter, Triangle};
use tracing::debug;

use crate::config::AreaMethod;

/// Surface area of a part in square metres.
///
/// Non-finite triangles contribute nothing; degenerate ones contribute 0
/// through the cross product. A part without triangles has area 0.
pub fn estimate_area(part: &Part, method: AreaMethod) -> f64 {
    match method {
        AreaMethod::Triangulated => triangulated_area(part),
        AreaMethod::BoundingBox => part.world_aabb().surface_area(),
    }
}

fn triangulated_area(part: &Part) -> f64 {
    let mut skipped = 0usize;
    let area = match part
        .transform
        .uniform_scale_factor(Tolerance::DEFAULT.relative)
    {
        Some(k) => {
            let local = sum_finite(part.triangles.iter().copied(), &mut skipped);
            local * k * k
        }
        None => sum_finite(part.world_triangles(), &mut skipped),
    };
    if skipped > 0 {
        debug!(part = %part.id, skipped, "ignored non-finite triangles in area");
    }
    area
}

fn sum_finite(triangles: impl Iterator<Item = Triangle>, skipped: &mut usize) -> f64 {
    let mut total = 0.0;
    for tri in triangles {
        if !tri.is_finite() {
            *skipped += 1;
            continue;
        }
        let a = tri.area();
        if a.is_finite() {
            total += a;
        } else {
            *skipped += 1;
        }
    }
    total
}

/// Memoized part areas for one loaded model.
///
/// Area depends only on geometry, so override edits never invalidate it;
/// loading a different model does.
#[derive(Debug, Clone, Default)]
pub struct AreaCache {
    method: AreaMethod,
    areas: HashMap<PartId, f64>,
}

impl AreaCache {
    /// Empty cache using `method`.
    pub fn new(method: AreaMethod) -> Self {
        Self {
            method,
            areas: HashMap::new(),
        }
    }

    /// Estimation method in use.
    pub fn method(&self) -> AreaMethod {
        self.method
    }

    /// Area of `id`, computing and caching it on first use.
    ///
    /// Parts no longer in the scene report 0 and are not cached.
    pub fn area(&mut self, scene: &dyn SceneAdapter, id: &PartId) -> f64 {
        if let Some(&a) = self.areas.get(id) {
            return a;
        }
        match scene.get_part(id) {
            Ok(part) => {
                let a = estimate_area(part, self.method);
                self.areas.insert(id.clone(), a);
                a
            }
            Err(_) => {
                debug!(part = %id, "area requested for part not in scene");
                0.0
            }
        }
    }

    /// Cached area, if already computed.
    pub fn get(&self, id: &PartId) -> Option<f64> {
        self.areas.get(id).copied()
    }

    /// Compute every uncached part area in parallel.
    ///
    /// Workers only read part geometry; results are merged here.
    pub fn warm(&mut self, parts: &[Part]) {
        let method = self.method;
        let computed: Vec<(PartId, f64)> = parts
            .par_iter()
            .filter(|p| !self.areas.contains_key(&p.id))
            .map(|p| (p.id.clone(), estimate_area(p, method)))
            .collect();
        debug!(count = computed.len(), "warmed area cache");
        self.areas.extend(computed);
    }

    /// Forget everything (a new model was loaded).
    pub fn invalidate(&mut self) {
        self.areas.clear();
    }

    /// Number of cached parts.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
