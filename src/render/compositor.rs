use crate::effects::composite::Paint;
use crate::foundation::core::PixelRect;
use crate::foundation::error::ShadowResult;
use crate::render::surface::{DrawTarget, PixelSurface};
use crate::style::ShadowStyle;

/// Scales and tints a snapshot into the shadow buffer.
///
/// One pass both rescales the silhouette to shadow-buffer resolution and recolors every covered
/// pixel to the style color, discarding the snapshot's own colors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShadowCompositor;

impl ShadowCompositor {
    /// Paint used for the tint pass and the final destination draws.
    pub fn paint(style: &ShadowStyle) -> Paint {
        Paint::tinted(style.color)
    }

    /// Clear `shadow` and draw all of `snapshot` into `dest_rect` with the style tint.
    pub fn composite(
        &self,
        snapshot: &PixelSurface,
        shadow: &mut PixelSurface,
        dest_rect: PixelRect,
        style: &ShadowStyle,
    ) -> ShadowResult<()> {
        shadow.clear();
        shadow.draw_image(snapshot, snapshot.rect(), dest_rect, &Self::paint(style))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
