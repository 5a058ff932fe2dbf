pub(crate) mod color;
pub(crate) mod config;

use serde::{Deserialize, Serialize};

use crate::style::color::ShadowColor;

/// Default blur spread, in shadow-buffer pixels.
pub const DEFAULT_SHADOW_RADIUS: u32 = 16;

/// Visual parameters of a shadow.
///
/// Mutating a style never reallocates buffers; it only takes effect on the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    /// Tint applied to every opaque pixel of the silhouette.
    pub color: ShadowColor,
    /// Recorded opacity. Currently advisory: it is not applied to any paint.
    pub alpha: u8,
    /// Blur spread. Also drives the downward offset (`radius / 2`).
    pub radius: u32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: ShadowColor::BLACK,
            alpha: 255,
            radius: DEFAULT_SHADOW_RADIUS,
        }
    }
}

impl ShadowStyle {
    /// Vertical displacement applied to the silhouette before blurring.
    pub fn drop_offset(&self) -> i32 {
        i32::try_from(self.radius / 2).unwrap_or(i32::MAX)
    }
}
