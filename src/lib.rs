//! View-shadow is a per-frame soft drop-shadow renderer.
//!
//! Given a source view ([`Renderable`]) and destination bounds, a [`ShadowRenderer`]:
//!
//! - snapshots the view into an offscreen buffer
//! - scales and tints the silhouette into a shadow buffer whose shorter side is pinned to a fixed
//!   base size, so blur cost does not grow with the final draw size
//! - shifts the silhouette down by half the blur radius, blurs it symmetrically, and draws the
//!   result twice onto the destination
//!
//! Buffers are cached in a [`BufferCache`] and only reallocated when sizes change. The blur is an
//! injected [`BlurBackend`]; [`CpuGaussianBlur`] is bundled.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod effects;
mod foundation;
mod render;
mod style;

pub use crate::foundation::core::{PixelRect, Rgba8Premul, Size};
pub use crate::foundation::error::{ShadowError, ShadowResult};

pub use crate::effects::blur::{
    BlurBackend, BlurBackendKind, BlurDevice, BlurWorkBuffers, CpuGaussianBlur,
    create_blur_backend, sigma_for_radius,
};
pub use crate::effects::composite::{ColorFilter, Paint, PremulRgba8, over};
pub use crate::render::buffer_cache::{
    BufferCache, BufferCacheOpts, BufferCacheStats, ShadowBuffers,
};
pub use crate::render::compositor::ShadowCompositor;
pub use crate::render::renderer::{
    DESTINATION_PASSES, DrawOutcome, DrawReport, Renderable, ShadowRenderer, SkipReason,
    shadow_buffer_size,
};
pub use crate::render::surface::{DrawTarget, PixelSurface};
pub use crate::render::view::{ImageView, surface_to_rgba_image};
pub use crate::style::color::ShadowColor;
pub use crate::style::config::{
    DEFAULT_MAX_SURFACE_BYTES, MAX_BLUR_RADIUS, SHADOW_BUFFER_BASE, ShadowConfig,
};
pub use crate::style::{DEFAULT_SHADOW_RADIUS, ShadowStyle};
