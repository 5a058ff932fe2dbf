use crate::foundation::core::{Affine, PixelRect, Vec2};
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::style::color::ShadowColor;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Color transform applied to an image while it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFilter {
    /// Porter-Duff source-atop of a flat color over the image.
    ///
    /// Keeps the image's alpha and replaces its color with the filter color.
    SrcAtop(ShadowColor),
}

/// Drawing parameters for [`DrawTarget::draw_image`](crate::DrawTarget::draw_image).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paint {
    /// Optional color filter applied to the drawn image.
    pub color_filter: Option<ColorFilter>,
    /// Bilinear sampling when `true`, nearest-neighbor otherwise.
    pub filter_bitmap: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color_filter: None,
            filter_bitmap: true,
        }
    }
}

impl Paint {
    /// Filtered paint that recolors everything it draws to `color`.
    pub fn tinted(color: ShadowColor) -> Self {
        Self {
            color_filter: Some(ColorFilter::SrcAtop(color)),
            filter_bitmap: true,
        }
    }
}

/// Source-over of premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over of a whole premultiplied layer onto `dst`.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> ShadowResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ShadowError::invalid_bounds(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Transform taking `src_rect` onto `dst_rect`, scaling each axis independently.
pub(crate) fn src_to_dst(src_rect: PixelRect, dst_rect: PixelRect) -> Affine {
    let sx = f64::from(dst_rect.width()) / f64::from(src_rect.width());
    let sy = f64::from(dst_rect.height()) / f64::from(src_rect.height());
    Affine::translate(Vec2::new(f64::from(dst_rect.x0), f64::from(dst_rect.y0)))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-f64::from(src_rect.x0), -f64::from(src_rect.y0)))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
