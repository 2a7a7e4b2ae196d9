//! Pointer → ray conversion.

use nalgebra::{Isometry3, Matrix4, Perspective3, Vector4};
use tessera_math::{Point3, Vec3};

use crate::{PickError, Ray, Result};

/// A perspective camera as the renderer last drew it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Point3,
    /// Point the camera looks at.
    pub target: Point3,
    /// Up hint.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Viewport width / height.
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Camera {
    /// Perspective camera at `position` looking at `target`, +Y up.
    pub fn look_at(position: Point3, target: Point3, fov_y_degrees: f64, aspect: f64) -> Self {
        Self {
            position,
            target,
            up: Vec3::y(),
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Combined projection * view matrix.
    pub fn view_projection(&self) -> Result<Matrix4<f64>> {
        let valid = self.aspect > 0.0
            && self.near > 0.0
            && self.far > self.near
            && self.fov_y_degrees > 0.0
            && self.fov_y_degrees < 180.0
            && (self.target - self.position).norm() > 0.0
            && (self.target - self.position).cross(&self.up).norm() > 1e-12;
        if !valid {
            return Err(PickError::InvalidCamera(format!("{self:?}")));
        }
        let view = Isometry3::look_at_rh(&self.position, &self.target, &self.up);
        let proj = Perspective3::new(
            self.aspect,
            self.fov_y_degrees.to_radians(),
            self.near,
            self.far,
        );
        Ok(proj.as_matrix() * view.to_homogeneous())
    }

    /// Ray through normalised device coordinates (`x`, `y` in -1..=1, +y up).
    ///
    /// The ray starts on the near plane.
    pub fn ray_from_ndc(&self, x: f64, y: f64) -> Result<Ray> {
        let inv = self
            .view_projection()?
            .try_inverse()
            .ok_or_else(|| PickError::InvalidCamera("singular view-projection".into()))?;
        let near = unproject(&inv, x, y, -1.0);
        let far = unproject(&inv, x, y, 1.0);
        Ray::new(near, far - near)
    }

    /// Ray through a pixel, with the origin at the top-left corner.
    pub fn ray_from_pixel(&self, px: f64, py: f64, width: f64, height: f64) -> Result<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PickError::InvalidCamera(format!(
                "viewport {width}x{height}"
            )));
        }
        let ndc_x = 2.0 * px / width - 1.0;
        let ndc_y = 1.0 - 2.0 * py / height;
        self.ray_from_ndc(ndc_x, ndc_y)
    }
}

fn unproject(inv_view_proj: &Matrix4<f64>, x: f64, y: f64, z: f64) -> Point3 {
    let v = inv_view_proj * Vector4::new(x, y, z, 1.0);
    if v.w.abs() < 1e-12 {
        Point3::new(v.x, v.y, v.z)
    } else {
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    }
}
