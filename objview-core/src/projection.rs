/// Perspective projection
use nalgebra::Matrix4;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Field-of-view perspective parameters
///
/// The default keeps the shipped demo's negative near plane. The formula is
/// applied as written for any sign of `near`, so a positive value gives the
/// usual OpenGL frustum.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Perspective {
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            near: -0.1,
            far: 0.9,
        }
    }
}

impl Perspective {
    pub fn new(fovy: f32, near: f32, far: f32) -> Self {
        Self { fovy, near, far }
    }

    /// Projection matrix for a surface with the given width / height ratio
    pub fn matrix(&self, aspect: f32) -> Result<Matrix4<f32>> {
        let Perspective { fovy, near, far } = *self;
        let invalid = Error::InvalidProjection {
            fovy,
            near,
            far,
            aspect,
        };
        if !(fovy > 0.0 && fovy < 180.0)
            || near == 0.0
            || far == near
            || !aspect.is_finite()
            || aspect <= 0.0
        {
            return Err(invalid);
        }

        let top = near * (fovy.to_radians() / 2.0).tan();
        let right = top * aspect;

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            near / right, 0.0,        0.0,                          0.0,
            0.0,          near / top, 0.0,                          0.0,
            0.0,          0.0,        -(far + near) / (far - near), -2.0 * far * near / (far - near),
            0.0,          0.0,        -1.0,                         0.0,
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_closed_form_entries() {
        let m = Perspective::new(90.0, 1.0, 10.0).matrix(1.0).unwrap();
        assert_close(m[(0, 0)], 1.0);
        assert_close(m[(1, 1)], 1.0);
        assert_close(m[(2, 2)], -11.0 / 9.0);
        assert_close(m[(2, 3)], -20.0 / 9.0);
        assert_close(m[(3, 2)], -1.0);
        assert_close(m[(3, 3)], 0.0);
        assert_close(m[(0, 2)], 0.0);
        assert_close(m[(1, 2)], 0.0);
    }

    #[test]
    fn test_aspect_scales_x_only() {
        let square = Perspective::new(60.0, 0.5, 50.0).matrix(1.0).unwrap();
        let wide = Perspective::new(60.0, 0.5, 50.0).matrix(2.0).unwrap();
        assert_close(wide[(0, 0)], square[(0, 0)] / 2.0);
        assert_close(wide[(1, 1)], square[(1, 1)]);
    }

    #[test]
    fn test_default_negative_near() {
        let perspective = Perspective::default();
        assert_eq!(perspective.near, -0.1);

        let m = perspective.matrix(1.0).unwrap();
        // near and top share a sign, so the focal terms stay positive.
        let focal = 1.0 / (22.5f32).to_radians().tan();
        assert_close(m[(0, 0)], focal);
        assert_close(m[(1, 1)], focal);
        assert_close(m[(2, 2)], -0.8);
        assert_close(m[(2, 3)], 0.18);
        assert_close(m[(3, 2)], -1.0);
    }

    #[test]
    fn test_rejects_division_by_zero() {
        assert!(Perspective::new(45.0, 0.0, 1.0).matrix(1.0).is_err());
        assert!(Perspective::new(45.0, 1.0, 1.0).matrix(1.0).is_err());
        assert!(Perspective::new(0.0, 0.1, 1.0).matrix(1.0).is_err());
        assert!(Perspective::new(180.0, 0.1, 1.0).matrix(1.0).is_err());
        assert!(Perspective::new(45.0, 0.1, 1.0).matrix(0.0).is_err());
        assert!(Perspective::new(45.0, 0.1, 1.0).matrix(f32::NAN).is_err());
    }
}
