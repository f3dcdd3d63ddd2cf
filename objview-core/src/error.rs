/// Errors produced while loading models and building view matrices
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A recognized OBJ line had a missing or non-numeric field
    #[error("line {line}: malformed `{directive}` {field}: {value:?}")]
    MalformedInput {
        line: usize,
        directive: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("vertex index {index} out of range ({len} vertices)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("triangle {triangle} has zero area, cannot estimate its normal")]
    DegenerateTriangle { triangle: usize },

    #[error("degenerate fallback normal {normal:?} has no usable direction")]
    InvalidFallback { normal: [f32; 3] },

    #[error("flat geometry of {len} points does not form whole triangles")]
    IncompleteTriangle { len: usize },

    #[error("camera up vector is parallel to the view direction")]
    DegenerateCamera,

    #[error("invalid perspective (fovy {fovy}, near {near}, far {far}, aspect {aspect})")]
    InvalidProjection {
        fovy: f32,
        near: f32,
        far: f32,
        aspect: f32,
    },

    #[error("invalid viewer configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
