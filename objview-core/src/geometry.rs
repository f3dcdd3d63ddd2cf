/// Geometry primitives: triangles, flat triangle lists and meshes
use nalgebra::{Vector3, Vector4};

use crate::error::{Error, Result};
use crate::normals::{estimate_normals, DegeneratePolicy};
use crate::obj;

/// A homogeneous model-space point, `w` is always 1
pub type Vertex = Vector4<f32>;

/// A unit surface normal
pub type Normal = Vector3<f32>;

pub fn vertex(x: f32, y: f32, z: f32) -> Vertex {
    Vector4::new(x, y, z, 1.0)
}

/// Three 0-based indices into a model's vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }

    /// Decompose a polygon into `len - 2` triangles pivoting on its first index.
    ///
    /// Polygons with fewer than three indices yield nothing.
    pub fn fan(face: &[usize]) -> impl Iterator<Item = Triangle> + '_ {
        let pivot = face.first().copied().unwrap_or_default();
        face.windows(2)
            .skip(1)
            .map(move |pair| Triangle::new(pivot, pair[0], pair[1]))
    }
}

/// Resolve every triangle against `vertices`, three points per triangle, no sharing
pub fn extract_triangles(vertices: &[Vertex], triangles: &[Triangle]) -> Result<Vec<Vertex>> {
    let mut points = Vec::with_capacity(triangles.len() * 3);
    for triangle in triangles {
        for &index in &triangle.indices {
            let point = vertices.get(index).ok_or(Error::IndexOutOfRange {
                index: index as i64,
                len: vertices.len(),
            })?;
            points.push(*point);
        }
    }
    Ok(points)
}

/// Flat-shaded triangle soup ready for upload
///
/// `positions` holds three points per triangle and `normals` runs parallel
/// to it, with the same normal repeated for each point of a triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vertex>,
    pub normals: Vec<Normal>,
}

impl Mesh {
    /// Parse OBJ text and run it through extraction and normal estimation
    pub fn from_obj(text: &str, policy: DegeneratePolicy) -> Result<Self> {
        let model = obj::parse(text)?;
        let positions = model.flat_geometry()?;
        let mesh = Self::from_positions(positions, policy)?;
        log::debug!(
            "built mesh: {} vertices, {} triangles ({} normals declared in file)",
            model.vertices.len(),
            mesh.triangle_count(),
            model.normals.len()
        );
        Ok(mesh)
    }

    pub fn from_positions(positions: Vec<Vertex>, policy: DegeneratePolicy) -> Result<Self> {
        let normals = estimate_normals(&positions, policy)?;
        Ok(Self { positions, normals })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions flattened to `x, y, z, w` scalars
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.iter().copied()).collect()
    }

    /// Normals flattened to `x, y, z` scalars
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.iter().copied()).collect()
    }

    /// Each triangle's three points together with its face normal
    pub fn triangles(&self) -> impl Iterator<Item = (&[Vertex], &Normal)> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(points, normals)| (points, &normals[0]))
    }
}
