use crate::effects::blur::BlurWorkBuffers;
use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::render::surface::PixelSurface;
use crate::style::config::DEFAULT_MAX_SURFACE_BYTES;

/// Cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct BufferCacheOpts {
    /// Largest single buffer, in bytes, the cache will allocate.
    pub max_surface_bytes: usize,
}

impl Default for BufferCacheOpts {
    fn default() -> Self {
        Self {
            max_surface_bytes: DEFAULT_MAX_SURFACE_BYTES,
        }
    }
}

/// Allocation counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferCacheStats {
    /// Snapshot buffer (re)allocations.
    pub snapshot_allocs: u64,
    /// Shadow buffer (re)allocations, each including its blur work buffers.
    pub shadow_allocs: u64,
    /// Total bytes allocated over the cache lifetime.
    pub alloc_bytes: u64,
    /// Allocation attempts that failed.
    pub failed_allocs: u64,
}

impl BufferCacheStats {
    /// Snapshot plus shadow allocations.
    pub fn total_allocs(&self) -> u64 {
        self.snapshot_allocs.saturating_add(self.shadow_allocs)
    }
}

/// Shadow surface together with the blur work buffers sized in lockstep with it.
#[derive(Debug, Clone)]
pub struct ShadowBuffers {
    surface: PixelSurface,
    work: BlurWorkBuffers,
    dest_rect: PixelRect,
}

impl ShadowBuffers {
    fn try_new(size: Size) -> ShadowResult<Self> {
        let surface = PixelSurface::new(size)?;
        let work = BlurWorkBuffers::try_new(size)?;
        Ok(Self {
            dest_rect: surface.rect(),
            surface,
            work,
        })
    }

    /// Shadow surface.
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    /// Blur work buffers matching [`ShadowBuffers::surface`].
    pub fn work(&self) -> &BlurWorkBuffers {
        &self.work
    }

    /// Buffer-sized rectangle the silhouette is composited into.
    ///
    /// Reset to `(0, 0, width, height)` on reallocation; the renderer shifts it transiently.
    pub fn dest_rect(&self) -> PixelRect {
        self.dest_rect
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&mut PixelSurface, &mut BlurWorkBuffers, &mut PixelRect) {
        (&mut self.surface, &mut self.work, &mut self.dest_rect)
    }
}

/// Owns the snapshot and shadow buffers and reallocates them only when their size changes.
///
/// A failed reallocation drops the previous buffer so no caller can proceed with a stale one.
#[derive(Debug, Default)]
pub struct BufferCache {
    opts: BufferCacheOpts,
    stats: BufferCacheStats,
    snapshot: Option<PixelSurface>,
    shadow: Option<ShadowBuffers>,
}

impl BufferCache {
    /// Create an empty cache. No buffer exists until the first `ensure_*` call.
    pub fn new(opts: BufferCacheOpts) -> Self {
        Self {
            opts,
            stats: BufferCacheStats::default(),
            snapshot: None,
            shadow: None,
        }
    }

    /// Allocation counters.
    pub fn stats(&self) -> BufferCacheStats {
        self.stats.clone()
    }

    /// Snapshot buffer, if allocated.
    pub fn snapshot(&self) -> Option<&PixelSurface> {
        self.snapshot.as_ref()
    }

    /// Shadow buffers, if allocated.
    pub fn shadow(&self) -> Option<&ShadowBuffers> {
        self.shadow.as_ref()
    }

    /// Return `true` once both buffers exist.
    pub fn is_ready(&self) -> bool {
        self.snapshot.is_some() && self.shadow.is_some()
    }

    /// Snapshot buffer of exactly `size`, reallocated only when the size differs.
    pub fn ensure_snapshot_buffer(&mut self, size: Size) -> ShadowResult<&mut PixelSurface> {
        let stale = self.snapshot.as_ref().is_none_or(|s| s.size() != size);
        if stale {
            self.snapshot = None;
            let bytes = self.check_budget(size)?;
            let surface = PixelSurface::new(size).inspect_err(|_| self.note_failure())?;
            tracing::debug!(width = size.width, height = size.height, "allocated snapshot buffer");
            self.stats.snapshot_allocs = self.stats.snapshot_allocs.saturating_add(1);
            self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(bytes);
            self.snapshot = Some(surface);
        }
        self.snapshot
            .as_mut()
            .ok_or_else(|| ShadowError::allocation("snapshot buffer missing after allocation"))
    }

    /// Shadow buffer and blur work buffers of exactly `size`, reallocated together.
    pub fn ensure_shadow_buffer(&mut self, size: Size) -> ShadowResult<&mut ShadowBuffers> {
        let stale = self
            .shadow
            .as_ref()
            .is_none_or(|s| s.surface.size() != size);
        if stale {
            self.shadow = None;
            let bytes = self.check_budget(size)?;
            let buffers = ShadowBuffers::try_new(size).inspect_err(|_| self.note_failure())?;
            tracing::debug!(width = size.width, height = size.height, "allocated shadow buffers");
            self.stats.shadow_allocs = self.stats.shadow_allocs.saturating_add(1);
            // Surface plus blur input and output.
            self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(bytes.saturating_mul(3));
            self.shadow = Some(buffers);
        }
        self.shadow
            .as_mut()
            .ok_or_else(|| ShadowError::allocation("shadow buffer missing after allocation"))
    }

    /// Both buffers at once, for the per-frame pipeline.
    pub(crate) fn buffers_mut(&mut self) -> Option<(&mut PixelSurface, &mut ShadowBuffers)> {
        match (self.snapshot.as_mut(), self.shadow.as_mut()) {
            (Some(snapshot), Some(shadow)) => Some((snapshot, shadow)),
            _ => None,
        }
    }

    fn check_budget(&mut self, size: Size) -> ShadowResult<u64> {
        let bytes = size.rgba8_len().filter(|&b| b <= self.opts.max_surface_bytes);
        match bytes {
            Some(b) => Ok(b as u64),
            None => {
                self.note_failure();
                Err(ShadowError::allocation(format!(
                    "{}x{} buffer exceeds the {} byte limit",
                    size.width, size.height, self.opts.max_surface_bytes
                )))
            }
        }
    }

    fn note_failure(&mut self) {
        self.stats.failed_allocs = self.stats.failed_allocs.saturating_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer_cache.rs"]
mod tests;
