/// Orbit camera: view matrix from orbit angles
use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};
use crate::transform::OrbitAngles;

/// Below this length a basis vector is treated as collapsed
const BASIS_EPSILON: f32 = 1e-6;

/// Reference camera before any orbit rotation
///
/// `at` and `up` are rotated by the orbit angles every frame; `eye` is
/// never rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub at: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, -1.0),
            at: Vector3::new(0.0, 0.0, -2.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

impl Camera {
    /// Build the view matrix for the given orbit.
    ///
    /// Fails with [`Error::DegenerateCamera`] when the rotated up vector ends
    /// up parallel to the view direction.
    pub fn view_matrix(&self, angles: &OrbitAngles) -> Result<Matrix4<f32>> {
        let rotation = angles.rotation();
        let at = rotation * self.at;
        let up = rotation * self.up;

        let n = (self.eye - at)
            .try_normalize(BASIS_EPSILON)
            .ok_or(Error::DegenerateCamera)?;
        let up = up
            .try_normalize(BASIS_EPSILON)
            .ok_or(Error::DegenerateCamera)?;
        let u = up
            .cross(&n)
            .try_normalize(BASIS_EPSILON)
            .ok_or(Error::DegenerateCamera)?;
        let v = n.cross(&u);

        let translate = Matrix4::new_translation(&-self.eye);
        #[rustfmt::skip]
        let basis = Matrix4::new(
            u.x, u.y, u.z, 0.0,
            v.x, v.y, v.z, 0.0,
            n.x, n.y, n.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        (basis * translate)
            .try_inverse()
            .ok_or(Error::DegenerateCamera)
    }
}
