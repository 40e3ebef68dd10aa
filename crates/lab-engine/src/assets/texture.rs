use serde::{Deserialize, Serialize};

/// A texture the host finished loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Path the texture was requested from (e.g., "textures/earth.jpg").
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Why a texture could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("texture {path} has unusable size {width}x{height}")]
    InvalidDimensions { path: String, width: u32, height: u32 },
}

impl TextureInfo {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    /// Reject empty images before they reach the scene.
    pub fn validate(self) -> Result<Self, AssetError> {
        if self.width == 0 || self.height == 0 {
            return Err(AssetError::InvalidDimensions {
                path: self.path,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    /// Parse load metadata reported by the host as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
