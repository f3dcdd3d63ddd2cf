/// objview core library - OBJ loading and camera math
///
/// Parses Wavefront OBJ text into flat-shaded triangle meshes and builds the
/// orbit camera, perspective and model matrices used by the front ends.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod normals;
pub mod obj;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use camera::Camera;
pub use config::{ModelSource, ViewerConfig};
pub use error::{Error, Result};
pub use geometry::{Mesh, Normal, Triangle, Vertex};
pub use normals::DegeneratePolicy;
pub use obj::ParsedModel;
pub use projection::Perspective;
pub use transform::{Axis, ModelTransform, OrbitAngles};
