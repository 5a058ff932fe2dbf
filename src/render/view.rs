use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::ShadowResult;
use crate::render::renderer::Renderable;
use crate::render::surface::PixelSurface;

/// A [`Renderable`] backed by a decoded raster image.
#[derive(Debug, Clone)]
pub struct ImageView {
    size: Size,
    rgba8_premul: Vec<u8>,
}

impl ImageView {
    /// Wrap a straight-alpha RGBA image.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            size: Size::new(width, height),
            rgba8_premul,
        }
    }

    /// Decode encoded image bytes.
    pub fn decode(bytes: &[u8]) -> ShadowResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Ok(Self::from_rgba_image(dyn_img.to_rgba8()))
    }

    /// Open and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> ShadowResult<Self> {
        let path = path.as_ref();
        let dyn_img =
            image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
        Ok(Self::from_rgba_image(dyn_img.to_rgba8()))
    }

    /// Premultiplied pixels.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

impl Renderable for ImageView {
    fn measure(&self) -> Size {
        self.size
    }

    fn paint_into(&self, surface: &mut PixelSurface) {
        let clip = PixelRect::from_size(self.size).intersect(surface.rect());
        if clip.is_empty() {
            return;
        }
        let src_stride = self.size.width as usize * 4;
        let dst_stride = surface.size().width as usize * 4;
        let row_len = clip.width() as usize * 4;
        let dst = surface.data_mut();
        for y in 0..clip.height() as usize {
            let s = y * src_stride;
            let d = y * dst_stride;
            dst[d..d + row_len].copy_from_slice(&self.rgba8_premul[s..s + row_len]);
        }
    }
}

/// Convert a surface into a straight-alpha RGBA image.
pub fn surface_to_rgba_image(surface: &PixelSurface) -> image::RgbaImage {
    let size = surface.size();
    let mut raw = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut raw);
    image::RgbaImage::from_raw(size.width, size.height, raw)
        .unwrap_or_else(|| image::RgbaImage::new(size.width, size.height))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
