//! Ray representation and basic ray-geometry tests.

use tessera_math::{Aabb3, Dir3, Point3, Vec3};
use tessera_scene::Triangle;

use crate::{PickError, Result};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction is normalized; a zero or non-finite direction is
    /// rejected.
    pub fn new(origin: Point3, direction: Vec3) -> Result<Self> {
        let finite = origin.coords.iter().chain(direction.iter()).all(|v| v.is_finite());
        if !finite {
            return Err(PickError::DegenerateDirection);
        }
        let dir = Dir3::try_new(direction, 1e-12).ok_or(PickError::DegenerateDirection)?;
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Ok(Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign,
        })
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))` if the ray intersects the box,
    /// where `t_min` and `t_max` are the entry and exit parameters.
    /// Returns `None` if no intersection or if the box is empty.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        if aabb.is_empty() {
            return None;
        }
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_min = tx1;
        let mut t_max = tx2;

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit if it lies beyond `epsilon`.
/// Both faces count; rays parallel to the triangle plane miss.
pub fn intersect_triangle(ray: &Ray, tri: &Triangle, epsilon: f64) -> Option<f64> {
    let dir = ray.direction.as_ref();
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - tri.a;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > epsilon).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        Triangle::from_arrays(&[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]])
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), Vec3::new(2.0, 0.0, 0.0)).unwrap();
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert_eq!(
            Ray::new(Point3::origin(), Vec3::zeros()).unwrap_err(),
            PickError::DegenerateDirection
        );
        assert!(Ray::new(Point3::new(f64::NAN, 0.0, 0.0), Vec3::x()).is_err());
    }

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let aabb = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let (t_min, t_max) = ray.intersect_aabb(&aabb).unwrap();
        assert!((t_min - 5.0).abs() < 1e-10);
        assert!((t_max - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        let aabb = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(ray.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_ray_empty_aabb() {
        let ray = Ray::new(Point3::origin(), Vec3::x()).unwrap();
        assert!(ray.intersect_aabb(&Aabb3::empty()).is_none());
    }

    #[test]
    fn test_triangle_hit_from_above() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 3.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let t = intersect_triangle(&ray, &floor_triangle(), 1e-9).unwrap();
        assert_relative_eq!(t, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_back_face_hit() {
        let ray = Ray::new(Point3::new(1.0, 1.0, -2.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let t = intersect_triangle(&ray, &floor_triangle(), 1e-9).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_miss_outside() {
        let ray = Ray::new(Point3::new(3.0, 3.0, 3.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(intersect_triangle(&ray, &floor_triangle(), 1e-9).is_none());
    }

    #[test]
    fn test_triangle_behind_origin() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 3.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(intersect_triangle(&ray, &floor_triangle(), 1e-9).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(intersect_triangle(&ray, &floor_triangle(), 1e-9).is_none());
    }
}
