/// Flat normal estimation for triangle lists

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::{Normal, Vertex};

/// What to do with a triangle whose cross product has no length
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Use this direction instead, normalized before use
    Fallback([f32; 3]),
    /// Fail the load
    Reject,
}

impl Default for DegeneratePolicy {
    fn default() -> Self {
        DegeneratePolicy::Fallback([0.0, 1.0, 0.0])
    }
}

impl DegeneratePolicy {
    /// The unit fallback normal, or `None` under [`DegeneratePolicy::Reject`].
    ///
    /// A zero-length or non-finite fallback is [`Error::InvalidFallback`].
    pub fn fallback_normal(&self) -> Result<Option<Normal>> {
        match *self {
            DegeneratePolicy::Fallback(normal) => Vector3::from(normal)
                .try_normalize(f32::MIN_POSITIVE)
                .filter(|n| n.iter().all(|c| c.is_finite()))
                .map(Some)
                .ok_or(Error::InvalidFallback { normal }),
            DegeneratePolicy::Reject => Ok(None),
        }
    }
}

/// Normal of the triangle `(p0, p1, p2)` as `(p2 - p0) x (p1 - p0)`.
///
/// Returns `None` when the points are collinear or coincident, or when the
/// result is not finite.
pub fn face_normal(p0: &Vertex, p1: &Vertex, p2: &Vertex) -> Option<Normal> {
    let u1 = p2.xyz() - p0.xyz();
    let u2 = p1.xyz() - p0.xyz();
    u1.cross(&u2)
        .try_normalize(f32::MIN_POSITIVE)
        .filter(|n| n.iter().all(|c| c.is_finite()))
}

/// One normal per point, repeated across the three points of each triangle
pub fn estimate_normals(points: &[Vertex], policy: DegeneratePolicy) -> Result<Vec<Normal>> {
    if points.len() % 3 != 0 {
        return Err(Error::IncompleteTriangle { len: points.len() });
    }

    let fallback = policy.fallback_normal()?;
    let mut normals = Vec::with_capacity(points.len());
    let mut degenerate = 0usize;
    for (triangle, tri) in points.chunks_exact(3).enumerate() {
        let n = match face_normal(&tri[0], &tri[1], &tri[2]) {
            Some(n) => n,
            None => match fallback {
                Some(n) => {
                    degenerate += 1;
                    n
                }
                None => return Err(Error::DegenerateTriangle { triangle }),
            },
        };
        normals.extend([n, n, n]);
    }

    if degenerate > 0 {
        log::warn!(
            "{} of {} triangles are degenerate, using fallback normal",
            degenerate,
            points.len() / 3
        );
    }
    Ok(normals)
}
