/// Scene configuration
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Target surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether all three coordinates sit on the same side outside `[0, limit)`
    pub(crate) fn all_outside(a: f32, b: f32, c: f32, limit: f32) -> bool {
        (a < 0.0 && b < 0.0 && c < 0.0) || (a >= limit && b >= limit && c >= limit)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400,
            height: 240,
        }
    }
}

/// How faces are ordered back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceOrdering {
    /// Face index stored in the low byte of the depth key. Shapes with more
    /// than 256 faces alias: face `i` is drawn in place of face `i % 256`.
    #[default]
    PackedKey,
    /// Depth key with the face index as a separate sort value. No face limit.
    KeyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub viewport: Viewport,
    /// Horizontal multiplier on the screen-center x offset
    pub horizontal_bias: f32,
    pub face_ordering: FaceOrdering,
    /// Initial light direction, expected to be unit length
    pub light: [f32; 3],
    /// Initial screen-center offset as fractions of the projection scale
    pub center: [f32; 2],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            horizontal_bias: 4.0 / 3.0,
            face_ordering: FaceOrdering::default(),
            light: [0.0, -1.0, 0.0],
            center: [0.5, 0.5],
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !self.horizontal_bias.is_finite() || self.horizontal_bias <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "horizontal_bias must be positive, got {}",
                self.horizontal_bias
            )));
        }
        if self.light.iter().chain(self.center.iter()).any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig("light and center must be finite".into()));
        }
        Ok(())
    }
}
