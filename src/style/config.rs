use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShadowError, ShadowResult};
use crate::style::ShadowStyle;

/// Shorter side of the shadow buffer, independent of the final draw size.
pub const SHADOW_BUFFER_BASE: u32 = 128;

/// Largest blur radius the bundled backends honor; larger requests are clamped.
pub const MAX_BLUR_RADIUS: u32 = 25;

/// Default per-surface allocation ceiling (64 MiB).
pub const DEFAULT_MAX_SURFACE_BYTES: usize = 64 * 1024 * 1024;

/// Renderer configuration, loadable from JSON.
///
/// Every field is optional in the JSON form and falls back to [`ShadowConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    /// Shadow-buffer normalization constant (`BASE`).
    pub base: u32,
    /// Initial shadow style.
    pub style: ShadowStyle,
    /// Radius ceiling reported by the blur device.
    pub max_blur_radius: u32,
    /// Largest single pixel buffer the cache will allocate.
    pub max_surface_bytes: usize,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            base: SHADOW_BUFFER_BASE,
            style: ShadowStyle::default(),
            max_blur_radius: MAX_BLUR_RADIUS,
            max_surface_bytes: DEFAULT_MAX_SURFACE_BYTES,
        }
    }
}

impl ShadowConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> ShadowResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ShadowError::config(format!("parse shadow config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(s: &str) -> ShadowResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a configuration from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> ShadowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShadowError::config(format!("open shadow config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject configurations the renderer cannot honor.
    pub fn validate(&self) -> ShadowResult<()> {
        if self.base == 0 {
            return Err(ShadowError::config("base must be > 0"));
        }
        if self.max_surface_bytes < 4 {
            return Err(ShadowError::config(
                "max_surface_bytes must hold at least one pixel",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/config.rs"]
mod tests;
