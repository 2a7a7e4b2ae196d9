#![warn(missing_docs)]

//! Math types for the tessera engine.
//!
//! Thin wrappers around nalgebra providing the handful of types the
//! scene, picker and area estimator share: points, vectors, directions,
//! affine part transforms, axis-aligned boxes and tolerance constants.
//!
//! All lengths are in metres, so areas come out in square metres.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Uniform scale by `k` on every axis.
    pub fn uniform_scale(k: f64) -> Self {
        Self::scale(k, k, k)
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Rotation by Euler angles in degrees, applied X first, then Y, then Z.
    pub fn rotation_euler_degrees(rx: f64, ry: f64, rz: f64) -> Self {
        Self::rotation_z(rz.to_radians())
            .then(&Self::rotation_y(ry.to_radians()))
            .then(&Self::rotation_x(rx.to_radians()))
    }

    /// Build a scene-graph style transform: scale, then rotate, then translate.
    ///
    /// `rotation` is Euler XYZ in degrees.
    pub fn from_trs(position: [f64; 3], rotation: [f64; 3], scale: [f64; 3]) -> Self {
        Self::translation(position[0], position[1], position[2])
            .then(&Self::rotation_euler_degrees(
                rotation[0],
                rotation[1],
                rotation[2],
            ))
            .then(&Self::scale(scale[0], scale[1], scale[2]))
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Upper-left 3x3 block (rotation and scale).
    pub fn linear(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The uniform scale factor of this transform, if it has one.
    ///
    /// Returns `Some(k)` when the linear part is `k` times a rotation (or
    /// reflection), i.e. `Mᵀ·M = k²·I` within `tol`. Shear or per-axis
    /// scale yields `None`.
    pub fn uniform_scale_factor(&self, tol: f64) -> Option<f64> {
        let m = self.linear();
        let mtm = m.transpose() * m;
        let k2 = mtm[(0, 0)];
        if !k2.is_finite() {
            return None;
        }
        let bound = tol * k2.max(1.0);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { k2 } else { 0.0 };
                if (mtm[(i, j)] - expected).abs() > bound {
                    return None;
                }
            }
        }
        Some(k2.sqrt())
    }

    /// True if every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent along each axis (zero for an empty box).
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Surface area of the box's six faces.
    pub fn surface_area(&self) -> f64 {
        let s = self.size();
        2.0 * (s.x * s.y + s.x * s.z + s.y * s.z)
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Relative tolerance used for scale detection.
    pub relative: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 relative).
    pub const DEFAULT: Self = Self { relative: 1e-9 };
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((t.apply_point(&p) - p).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let result = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trs_order() {
        // scale 2, rotate 90° about Z, then move +10 in x
        let t = Transform::from_trs([10.0, 0.0, 0.0], [0.0, 0.0, 90.0], [2.0, 2.0, 2.0]);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_scale_detected_through_rotation() {
        let t = Transform::from_trs([3.0, -1.0, 4.0], [30.0, 45.0, 60.0], [2.5, 2.5, 2.5]);
        let k = t.uniform_scale_factor(1e-9).unwrap();
        assert_relative_eq!(k, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_non_uniform_scale_rejected() {
        let t = Transform::scale(1.0, 2.0, 1.0);
        assert!(t.uniform_scale_factor(1e-9).is_none());
    }

    #[test]
    fn test_mirror_counts_as_uniform() {
        let t = Transform::scale(-3.0, 3.0, 3.0);
        assert_relative_eq!(t.uniform_scale_factor(1e-9).unwrap(), 3.0);
    }

    #[test]
    fn test_aabb_surface_area() {
        let mut bb = Aabb3::empty();
        assert!(bb.is_empty());
        assert_eq!(bb.surface_area(), 0.0);
        bb.include_point(&Point3::new(0.0, 0.0, 0.0));
        bb.include_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(bb.surface_area(), 2.0 * (2.0 + 3.0 + 6.0));
    }
}
