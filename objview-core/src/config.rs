/// Viewer configuration, deserialized from JSON
use serde::Deserialize;

use crate::error::Result;
use crate::normals::DegeneratePolicy;
use crate::projection::Perspective;
use crate::transform::ModelTransform;

pub const TEACUP_URL: &str =
    "https://raw.githubusercontent.com/BethSandraT/PublicObjFiles/main/teacup.obj";
pub const TEAPOT_URL: &str =
    "https://raw.githubusercontent.com/BethSandraT/PublicObjFiles/main/teapot.obj";

/// A model to load and where to place it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSource {
    /// URL (web) or file path (terminal) of the OBJ text
    pub source: String,
    #[serde(default)]
    pub transform: ModelTransform,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Loaded in order, drawn in order
    pub models: Vec<ModelSource>,
    pub perspective: Perspective,
    pub degenerate: DegeneratePolicy,
    pub clear_color: [f32; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ModelSource {
                    source: TEACUP_URL.to_string(),
                    transform: ModelTransform {
                        scale: 0.0225,
                        rotation: [0.0, -std::f32::consts::FRAC_PI_8, 0.0],
                        translation: [0.3, -0.15, 0.0],
                    },
                },
                ModelSource {
                    source: TEAPOT_URL.to_string(),
                    transform: ModelTransform {
                        scale: 1.725,
                        rotation: [0.0; 3],
                        translation: [-0.2, -0.15, 0.0],
                    },
                },
            ],
            perspective: Perspective::default(),
            degenerate: DegeneratePolicy::default(),
            clear_color: [0.9, 0.9, 0.9, 1.0],
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration, rejecting a fallback normal with no direction
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.degenerate.fallback_normal()?;
        Ok(config)
    }
}
