use std::fmt;
use std::sync::Arc;

use crate::effects::composite::{ColorFilter, Paint, over_in_place, src_to_dst};
use crate::foundation::core::{Affine, PixelRect, Rect, Rgba8Premul, Size};
use crate::foundation::error::{ShadowError, ShadowResult};

/// Destination for final shadow draws.
pub trait DrawTarget {
    /// Draw `src_rect` of `image` scaled into `dst_rect` of this target.
    fn draw_image(
        &mut self,
        image: &PixelSurface,
        src_rect: PixelRect,
        dst_rect: PixelRect,
        paint: &Paint,
    ) -> ShadowResult<()>;
}

/// Offscreen premultiplied RGBA8 pixel buffer that can also be painted into.
#[derive(Clone)]
pub struct PixelSurface {
    pixmap: vello_cpu::Pixmap,
}

impl PixelSurface {
    /// Allocate a transparent surface.
    ///
    /// Fails with [`ShadowError::AllocationFailure`] for empty sizes or extents the pixel store
    /// cannot address.
    pub fn new(size: Size) -> ShadowResult<Self> {
        if size.is_empty() {
            return Err(ShadowError::allocation(format!(
                "surface must be non-empty, got {}x{}",
                size.width, size.height
            )));
        }
        let w: u16 = size.width.try_into().map_err(|_| {
            ShadowError::allocation(format!("surface width exceeds u16: {}", size.width))
        })?;
        let h: u16 = size.height.try_into().map_err(|_| {
            ShadowError::allocation(format!("surface height exceeds u16: {}", size.height))
        })?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Build a surface from tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(size: Size, bytes: &[u8]) -> ShadowResult<Self> {
        let mut surface = Self::new(size)?;
        let data = surface.data_mut();
        if data.len() != bytes.len() {
            return Err(ShadowError::invalid_bounds(
                "surface bytes must match width*height*4",
            ));
        }
        data.copy_from_slice(bytes);
        Ok(surface)
    }

    /// Surface dimensions.
    pub fn size(&self) -> Size {
        Size::new(u32::from(self.pixmap.width()), u32::from(self.pixmap.height()))
    }

    /// `(0, 0, width, height)`.
    pub fn rect(&self) -> PixelRect {
        PixelRect::from_size(self.size())
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Mutable premultiplied RGBA8 bytes, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Fill `rect` (clipped to the surface) with `color`, replacing existing pixels.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8Premul) {
        let clip = rect.intersect(self.rect());
        if clip.is_empty() {
            return;
        }
        let w = self.size().width as usize;
        let px = color.to_array();
        let data = self.data_mut();
        for y in clip.y0..clip.y1 {
            let row = (y as usize) * w;
            for x in clip.x0..clip.x1 {
                let idx = (row + x as usize) * 4;
                data[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    /// Pixel at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let size = self.size();
        if x >= size.width || y >= size.height {
            return None;
        }
        let idx = ((y as usize) * (size.width as usize) + x as usize) * 4;
        let d = self.data();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    /// Mean alpha over the whole surface.
    pub fn mean_alpha(&self) -> f64 {
        let d = self.data();
        let n = d.len() / 4;
        if n == 0 {
            return 0.0;
        }
        let sum: u64 = d.chunks_exact(4).map(|px| u64::from(px[3])).sum();
        sum as f64 / n as f64
    }
}

impl DrawTarget for PixelSurface {
    /// Rasterizes `image` through a `vello_cpu` context sized like this surface, then blends the
    /// resulting layer source-over.
    fn draw_image(
        &mut self,
        image: &PixelSurface,
        src_rect: PixelRect,
        dst_rect: PixelRect,
        paint: &Paint,
    ) -> ShadowResult<()> {
        if image.size().is_empty() || src_rect.is_empty() || dst_rect.is_empty() {
            return Ok(());
        }
        if dst_rect.intersect(self.rect()).is_empty() {
            return Ok(());
        }

        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(affine_to_cpu(src_to_dst(src_rect, dst_rect)));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let area = rect_to_cpu(src_rect.to_rect());

        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(image.pixmap.clone())),
            sampler: vello_cpu::peniko::ImageSampler {
                quality: if paint.filter_bitmap {
                    vello_cpu::peniko::ImageQuality::Medium
                } else {
                    vello_cpu::peniko::ImageQuality::Low
                },
                ..vello_cpu::peniko::ImageSampler::default()
            },
        });
        ctx.fill_rect(&area);

        if let Some(ColorFilter::SrcAtop(color)) = paint.color_filter {
            ctx.push_blend_layer(vello_cpu::peniko::BlendMode::new(
                vello_cpu::peniko::Mix::Normal,
                vello_cpu::peniko::Compose::SrcAtop,
            ));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_rect(&area);
            ctx.pop_layer();
        }

        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut layer);
        over_in_place(self.data_mut(), layer.data_as_u8_slice())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        f.debug_struct("PixelSurface")
            .field("width", &size.width)
            .field("height", &size.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
