//! Parts and their triangles.

use tessera_ir::PartId;
use tessera_math::{Aabb3, Point3, Transform, Vec3};

/// A triangle given by three corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner.
    pub a: Point3,
    /// Second corner.
    pub b: Point3,
    /// Third corner.
    pub c: Point3,
}

impl Triangle {
    /// Create a triangle from three corners.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Create a triangle from `[x, y, z]` arrays.
    pub fn from_arrays(corners: &[[f64; 3]; 3]) -> Self {
        let p = |v: &[f64; 3]| Point3::new(v[0], v[1], v[2]);
        Self::new(p(&corners[0]), p(&corners[1]), p(&corners[2]))
    }

    /// True if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c]
            .iter()
            .all(|p| p.coords.iter().all(|v| v.is_finite()))
    }

    /// Unnormalized normal `(b - a) × (c - a)`.
    pub fn cross(&self) -> Vec3 {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// Area as half the cross-product magnitude.
    ///
    /// Collinear corners give exactly 0.
    pub fn area(&self) -> f64 {
        0.5 * self.cross().norm()
    }

    /// This triangle with every corner mapped through `t`.
    pub fn transformed(&self, t: &Transform) -> Self {
        Self::new(t.apply_point(&self.a), t.apply_point(&self.b), t.apply_point(&self.c))
    }
}

/// A pickable leaf of the loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Stable identity, unique within one loaded model.
    pub id: PartId,
    /// Optional display name.
    pub name: Option<String>,
    /// Local-space triangles.
    pub triangles: Vec<Triangle>,
    /// Local → world transform.
    pub transform: Transform,
}

impl Part {
    /// Create a part with an identity transform.
    pub fn new(id: impl Into<PartId>, triangles: Vec<Triangle>) -> Self {
        Self {
            id: id.into(),
            name: None,
            triangles,
            transform: Transform::identity(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the world transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles in world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.triangles.iter().map(|t| t.transformed(&self.transform))
    }

    /// World-space bounding box over finite triangles.
    pub fn world_aabb(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for tri in self.world_triangles().filter(Triangle::is_finite) {
            bb.include_point(&tri.a);
            bb.include_point(&tri.b);
            bb.include_point(&tri.c);
        }
        bb
    }
}

/// Twelve triangles covering the faces of the box `[0, sx] × [0, sy] × [0, sz]`.
pub fn cuboid(sx: f64, sy: f64, sz: f64) -> Vec<Triangle> {
    let v = |x: f64, y: f64, z: f64| Point3::new(x * sx, y * sy, z * sz);
    let quads = [
        [v(0., 0., 0.), v(1., 0., 0.), v(1., 1., 0.), v(0., 1., 0.)],
        [v(0., 0., 1.), v(1., 0., 1.), v(1., 1., 1.), v(0., 1., 1.)],
        [v(0., 0., 0.), v(1., 0., 0.), v(1., 0., 1.), v(0., 0., 1.)],
        [v(0., 1., 0.), v(1., 1., 0.), v(1., 1., 1.), v(0., 1., 1.)],
        [v(0., 0., 0.), v(0., 1., 0.), v(0., 1., 1.), v(0., 0., 1.)],
        [v(1., 0., 0.), v(1., 1., 0.), v(1., 1., 1.), v(1., 0., 1.)],
    ];
    quads
        .iter()
        .flat_map(|q| [Triangle::new(q[0], q[1], q[2]), Triangle::new(q[0], q[2], q[3])])
        .collect()
}
