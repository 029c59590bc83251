use crate::color::Hsv;
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// The longest coalescing window accepted for the hue throttle.
pub const MAX_THROTTLE_MS: u64 = 1000;

/// Picker settings, shared by every session a factory creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PickerConfig {
    /// Number of samples in the hue strip, default: 256
    #[serde(alias = "width")]
    pub hue_strip_width: u32,
    /// Width of the saturation/value plane in pixels, default: 256
    pub plane_width: u32,
    /// Height of the saturation/value plane in pixels, default: 256
    pub plane_height: u32,
    /// Coalescing window for plane redraws while the hue is dragged, default: 50
    pub throttle_ms: u64,
    /// Color a new session starts with.
    pub initial: Hsv,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            hue_strip_width: 256,
            plane_width: 256,
            plane_height: 256,
            throttle_ms: 50,
            initial: Hsv::default(),
        }
    }
}

impl PickerConfig {
    /// Parse and validate a JSON config. Missing fields use their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Read a JSON config from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Check the dimensions and throttle window.
    pub fn validated(self) -> Result<Self> {
        if self.hue_strip_width == 0 {
            return Err(Error::InvalidConfig("hue_strip_width must be > 0".into()));
        }
        if self.plane_width == 0 || self.plane_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "plane size must be > 0, got {}x{}",
                self.plane_width, self.plane_height
            )));
        }
        if self.throttle_ms > MAX_THROTTLE_MS {
            return Err(Error::InvalidConfig(format!(
                "throttle_ms must be <= {}, got {}",
                MAX_THROTTLE_MS, self.throttle_ms
            )));
        }
        Ok(self)
    }
}
