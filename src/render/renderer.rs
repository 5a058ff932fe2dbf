use crate::effects::blur::{BlurBackend, BlurBackendKind, BlurDevice, create_blur_backend};
use crate::effects::composite::Paint;
use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::render::buffer_cache::{BufferCache, BufferCacheOpts, BufferCacheStats, ShadowBuffers};
use crate::render::compositor::ShadowCompositor;
use crate::render::surface::{DrawTarget, PixelSurface};
use crate::style::ShadowStyle;
use crate::style::color::ShadowColor;
use crate::style::config::{SHADOW_BUFFER_BASE, ShadowConfig};

/// Number of times the blurred shadow is drawn onto the destination per frame.
///
/// Two source-over draws of a translucent shadow approximate one darker draw without a second
/// blur. Further draws would add little once alpha saturates.
pub const DESTINATION_PASSES: u32 = 2;

/// The element a shadow is cast for.
pub trait Renderable {
    /// Current width and height. Read fresh on every draw.
    fn measure(&self) -> Size;

    /// Paint the current visual state into `surface`.
    ///
    /// `surface` is exactly [`Renderable::measure`] sized and already cleared to transparent.
    fn paint_into(&self, surface: &mut PixelSurface);
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn measure(&self) -> Size {
        (**self).measure()
    }

    fn paint_into(&self, surface: &mut PixelSurface) {
        (**self).paint_into(surface)
    }
}

/// Why a draw produced no shadow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The source view has zero width or height.
    EmptyView,
    /// The bounds have zero width or height.
    EmptyBounds,
    /// No blur backend could be created.
    BackendUnavailable,
    /// A buffer could not be (re)allocated.
    AllocationFailure,
    /// The blur backend or a draw step failed.
    RenderFailure,
}

/// Result of one [`ShadowRenderer::draw`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The shadow was drawn onto the destination.
    Drawn,
    /// Nothing was drawn this frame.
    Skipped(SkipReason),
}

/// Geometry of the last successful draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawReport {
    /// Destination rectangle.
    pub bounds: PixelRect,
    /// Measured source view size.
    pub view_size: Size,
    /// Normalized shadow buffer size.
    pub shadow_size: Size,
    /// Rectangle the silhouette was composited into before blurring.
    pub composite_rect: PixelRect,
    /// Shadow-buffer rectangle drawn onto `bounds`.
    pub final_src_rect: PixelRect,
    /// Destination draws issued.
    pub passes: u32,
}

/// Shadow buffer size for `bounds`: the shorter side is pinned to `base`, the aspect ratio kept.
///
/// Returns `None` for empty bounds.
pub fn shadow_buffer_size(bounds: Size, base: u32) -> Option<Size> {
    if bounds.is_empty() {
        return None;
    }
    let ar = f64::from(bounds.width) / f64::from(bounds.height);
    let base_f = f64::from(base);
    let (w, h) = if ar > 1.0 {
        (base_f * ar, base_f)
    } else {
        (base_f, base_f / ar)
    };
    Some(Size::new(to_extent(w), to_extent(h)))
}

fn to_extent(v: f64) -> u32 {
    (v as u32).max(1)
}

/// Renders and refreshes a soft drop shadow beneath a [`Renderable`].
///
/// Buffers are created lazily on the first draw and reallocated only when the view size or the
/// bounds aspect ratio changes. All failures are logged and turn into a skipped frame; the next
/// draw retries from scratch.
pub struct ShadowRenderer<V> {
    view: V,
    blur: Option<Box<dyn BlurBackend>>,
    cache: BufferCache,
    compositor: ShadowCompositor,
    style: ShadowStyle,
    base: u32,
    redraw_requested: bool,
    last_report: Option<DrawReport>,
}

impl<V: Renderable> ShadowRenderer<V> {
    /// Create a renderer for `view` with an injected blur backend.
    ///
    /// An unavailable backend is logged once here; every later draw is then skipped.
    pub fn new(view: V, blur: ShadowResult<Box<dyn BlurBackend>>, config: &ShadowConfig) -> Self {
        let blur = match blur {
            Ok(b) => {
                tracing::debug!(
                    backend = b.name(),
                    max_radius = b.max_radius(),
                    "blur backend ready"
                );
                Some(b)
            }
            Err(e) => {
                tracing::warn!(error = %e, "blur backend unavailable; shadows disabled");
                None
            }
        };
        Self {
            view,
            blur,
            cache: BufferCache::new(BufferCacheOpts {
                max_surface_bytes: config.max_surface_bytes,
            }),
            compositor: ShadowCompositor,
            style: config.style,
            base: if config.base == 0 {
                SHADOW_BUFFER_BASE
            } else {
                config.base
            },
            redraw_requested: false,
            last_report: None,
        }
    }

    /// Create a renderer backed by the CPU Gaussian blur.
    pub fn with_cpu_blur(view: V, config: &ShadowConfig) -> Self {
        let device = BlurDevice {
            max_radius: config.max_blur_radius,
        };
        let blur = create_blur_backend(BlurBackendKind::Cpu, &device);
        Self::new(view, blur, config)
    }

    /// Source view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable source view. Changes are picked up on the next draw.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Current style.
    pub fn style(&self) -> &ShadowStyle {
        &self.style
    }

    /// Return `true` when a blur backend is available.
    pub fn has_backend(&self) -> bool {
        self.blur.is_some()
    }

    /// Buffer allocation counters.
    pub fn cache_stats(&self) -> BufferCacheStats {
        self.cache.stats()
    }

    /// Blurred shadow buffer of the last draw, if any.
    pub fn shadow_surface(&self) -> Option<&PixelSurface> {
        self.cache.shadow().map(ShadowBuffers::surface)
    }

    /// Geometry of the last successful draw.
    pub fn last_report(&self) -> Option<DrawReport> {
        self.last_report
    }

    /// Paint used for the destination draws.
    pub fn paint(&self) -> Paint {
        ShadowCompositor::paint(&self.style)
    }

    /// Change the shadow tint. No-op when unchanged.
    pub fn set_color(&mut self, color: ShadowColor) {
        if self.style.color != color {
            self.style.color = color;
            self.invalidate();
        }
    }

    /// Record the shadow opacity.
    ///
    /// The value is stored and requests a redraw but is not applied to any paint.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.style.alpha = alpha;
        self.invalidate();
    }

    /// Change the blur spread (and with it the downward offset). No-op when unchanged.
    pub fn set_radius(&mut self, radius: u32) {
        if self.style.radius != radius {
            self.style.radius = radius;
            self.invalidate();
        }
    }

    /// Ask the host for a redraw.
    pub fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    /// Drain a pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Render the shadow for the current view into `bounds` of `dest`.
    ///
    /// Runs to completion synchronously. Never fails: problems are logged and reported as
    /// [`DrawOutcome::Skipped`].
    #[tracing::instrument(
        level = "trace",
        skip(self, dest),
        fields(w = bounds.width(), h = bounds.height())
    )]
    pub fn draw(&mut self, bounds: PixelRect, dest: &mut dyn DrawTarget) -> DrawOutcome {
        let view_size = self.view.measure();
        if view_size.is_empty() {
            tracing::trace!(?view_size, "view not laid out; skipping shadow");
            return DrawOutcome::Skipped(SkipReason::EmptyView);
        }
        let Some(shadow_size) = shadow_buffer_size(bounds.size(), self.base) else {
            tracing::trace!(?bounds, "empty bounds; skipping shadow");
            return DrawOutcome::Skipped(SkipReason::EmptyBounds);
        };
        if self.blur.is_none() {
            return DrawOutcome::Skipped(SkipReason::BackendUnavailable);
        }

        match self.render(bounds, view_size, shadow_size, dest) {
            Ok(report) => {
                self.last_report = Some(report);
                DrawOutcome::Drawn
            }
            Err(ShadowError::AllocationFailure(msg)) => {
                tracing::warn!(
                    %msg,
                    ?view_size,
                    ?shadow_size,
                    "shadow buffer allocation failed; skipping frame"
                );
                DrawOutcome::Skipped(SkipReason::AllocationFailure)
            }
            Err(e) => {
                tracing::warn!(error = %e, "shadow render failed; skipping frame");
                DrawOutcome::Skipped(SkipReason::RenderFailure)
            }
        }
    }

    fn render(
        &mut self,
        bounds: PixelRect,
        view_size: Size,
        shadow_size: Size,
        dest: &mut dyn DrawTarget,
    ) -> ShadowResult<DrawReport> {
        self.cache.ensure_shadow_buffer(shadow_size)?;
        self.cache.ensure_snapshot_buffer(view_size)?;

        let style = self.style;
        let paint = ShadowCompositor::paint(&style);
        let blur = self
            .blur
            .as_deref_mut()
            .ok_or_else(|| ShadowError::backend_unavailable("no blur backend"))?;
        let (snapshot, shadow) = self
            .cache
            .buffers_mut()
            .ok_or_else(|| ShadowError::allocation("buffers missing after allocation"))?;

        snapshot.clear();
        self.view.paint_into(snapshot);

        let (surface, work, dest_rect) = shadow.parts_mut();
        let drop = style.drop_offset();

        let resting_rect = *dest_rect;
        dest_rect.offset(0, drop);
        let composite_rect = *dest_rect;
        let blurred = composite_and_blur(
            &self.compositor,
            snapshot,
            surface,
            work,
            composite_rect,
            &style,
            blur,
        );
        // Offsets saturate near i32::MAX; restore the saved rect exactly.
        *dest_rect = resting_rect;
        blurred?;

        let final_src_rect = *dest_rect;
        for _ in 0..DESTINATION_PASSES {
            dest.draw_image(surface, final_src_rect, bounds, &paint)?;
        }

        Ok(DrawReport {
            bounds,
            view_size,
            shadow_size,
            composite_rect,
            final_src_rect,
            passes: DESTINATION_PASSES,
        })
    }
}

fn composite_and_blur(
    compositor: &ShadowCompositor,
    snapshot: &PixelSurface,
    surface: &mut PixelSurface,
    work: &mut crate::effects::blur::BlurWorkBuffers,
    composite_rect: PixelRect,
    style: &ShadowStyle,
    blur: &mut dyn BlurBackend,
) -> ShadowResult<()> {
    compositor.composite(snapshot, surface, composite_rect, style)?;
    work.load(surface.data())?;
    work.run(blur, style.radius)?;
    work.store(surface.data_mut())
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
