/// Orbit angles and per-model transformation matrices
use std::f32::consts::PI;

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};
use serde::Deserialize;

/// One of the three orbit axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" | "X" => Some(Axis::X),
            "y" | "Y" => Some(Axis::Y),
            "z" | "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Camera orbit around three axes, each angle a fraction of π radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl OrbitAngles {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Rotate by delta amounts (fractions of π)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// `Rx * Ry * Rz`, so the z rotation applies first
    pub fn rotation(&self) -> Matrix3<f32> {
        let rx = Rotation3::new(Vector3::x() * (self.x * PI));
        let ry = Rotation3::new(Vector3::y() * (self.y * PI));
        let rz = Rotation3::new(Vector3::z() * (self.z * PI));
        (rx * ry * rz).into_inner()
    }
}

/// Static placement of a model in the world
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelTransform {
    /// Uniform scale factor
    pub scale: f32,
    /// Euler angles in radians, applied z first
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: [0.0; 3],
            translation: [0.0; 3],
        }
    }
}

impl ModelTransform {
    /// `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let [ax, ay, az] = self.rotation;
        let [tx, ty, tz] = self.translation;
        let rx = Matrix4::new_rotation(Vector3::new(ax, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, ay, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, az));

        Matrix4::new_translation(&Vector3::new(tx, ty, tz))
            * rx
            * ry
            * rz
            * Matrix4::new_scaling(self.scale)
    }
}

/// Full transform chain as uploaded to the shader: `projection * view * model`
pub fn mvp_matrix(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}
