use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::style::config::MAX_BLUR_RADIUS;

/// A radius-parameterized blur over a fixed-size premultiplied RGBA8 buffer.
///
/// Implementations run synchronously; the caller blocks until `apply` returns.
pub trait BlurBackend {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Largest radius honored. Larger requests are clamped to this value.
    fn max_radius(&self) -> u32;

    /// Blur `input` into `output`. Both must hold exactly `size.width * size.height * 4` bytes.
    fn apply(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        size: Size,
        radius: u32,
    ) -> ShadowResult<()>;
}

/// Available blur backend kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlurBackendKind {
    /// Separable fixed-point Gaussian on the CPU.
    #[default]
    Cpu,
}

/// Capabilities of the device a backend is created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurDevice {
    /// Largest blur radius the device supports. Zero means no blur support.
    pub max_radius: u32,
}

impl Default for BlurDevice {
    fn default() -> Self {
        Self {
            max_radius: MAX_BLUR_RADIUS,
        }
    }
}

/// Create a blur backend for `device`.
///
/// Fails with [`ShadowError::BackendUnavailable`] when the device cannot blur at all.
pub fn create_blur_backend(
    kind: BlurBackendKind,
    device: &BlurDevice,
) -> ShadowResult<Box<dyn BlurBackend>> {
    if device.max_radius == 0 {
        return Err(ShadowError::backend_unavailable(
            "device reports no blur support (max_radius = 0)",
        ));
    }
    match kind {
        BlurBackendKind::Cpu => Ok(Box::new(CpuGaussianBlur::new(device.max_radius))),
    }
}

/// Input/output buffers handed to a [`BlurBackend`].
///
/// Always sized in lockstep with the shadow surface they belong to.
#[derive(Clone, Debug)]
pub struct BlurWorkBuffers {
    size: Size,
    input: Vec<u8>,
    output: Vec<u8>,
}

impl BlurWorkBuffers {
    /// Allocate zeroed buffers for `size`, reporting exhaustion instead of aborting.
    pub fn try_new(size: Size) -> ShadowResult<Self> {
        let len = size
            .rgba8_len()
            .ok_or_else(|| ShadowError::allocation("blur work buffer size overflow"))?;
        Ok(Self {
            size,
            input: try_alloc_zeroed(len)?,
            output: try_alloc_zeroed(len)?,
        })
    }

    /// Dimensions shared by both buffers.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Blur input bytes.
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Blur output bytes.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Copy `src` into the input buffer.
    pub fn load(&mut self, src: &[u8]) -> ShadowResult<()> {
        if src.len() != self.input.len() {
            return Err(ShadowError::blur(
                "blur input expects bytes matching width*height*4",
            ));
        }
        self.input.copy_from_slice(src);
        Ok(())
    }

    /// Copy the output buffer into `dst`.
    pub fn store(&self, dst: &mut [u8]) -> ShadowResult<()> {
        if dst.len() != self.output.len() {
            return Err(ShadowError::blur(
                "blur output expects bytes matching width*height*4",
            ));
        }
        dst.copy_from_slice(&self.output);
        Ok(())
    }

    /// Run `backend` from the input buffer into the output buffer.
    pub fn run(&mut self, backend: &mut dyn BlurBackend, radius: u32) -> ShadowResult<()> {
        backend.apply(&self.input, &mut self.output, self.size, radius)
    }
}

fn try_alloc_zeroed(len: usize) -> ShadowResult<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| ShadowError::allocation(format!("reserve {len} bytes: {e}")))?;
    v.resize(len, 0);
    Ok(v)
}

/// Standard deviation used for a given radius.
///
/// Matches the relation used by common intrinsic blur implementations.
pub fn sigma_for_radius(radius: u32) -> f32 {
    0.4 * radius as f32 + 0.6
}

/// Separable Gaussian blur using Q16 fixed-point kernels.
///
/// Edges clamp to the nearest pixel. Kernels are cached per radius and the intermediate buffer is
/// reused across calls.
#[derive(Debug)]
pub struct CpuGaussianBlur {
    max_radius: u32,
    kernel_cache: HashMap<u32, Arc<Vec<u32>>>,
    scratch: Vec<u8>,
}

impl CpuGaussianBlur {
    /// Create a backend honoring radii up to `max_radius`.
    pub fn new(max_radius: u32) -> Self {
        Self {
            max_radius,
            kernel_cache: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    fn kernel(&mut self, radius: u32) -> ShadowResult<Arc<Vec<u32>>> {
        if let Some(k) = self.kernel_cache.get(&radius) {
            return Ok(k.clone());
        }
        let k = Arc::new(kernel_q16(radius, sigma_for_radius(radius))?);
        self.kernel_cache.insert(radius, k.clone());
        Ok(k)
    }
}

impl Default for CpuGaussianBlur {
    fn default() -> Self {
        Self::new(MAX_BLUR_RADIUS)
    }
}

impl BlurBackend for CpuGaussianBlur {
    fn name(&self) -> &'static str {
        "cpu-gaussian"
    }

    fn max_radius(&self) -> u32 {
        self.max_radius
    }

    fn apply(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        size: Size,
        radius: u32,
    ) -> ShadowResult<()> {
        let expected = size
            .rgba8_len()
            .ok_or_else(|| ShadowError::blur("blur buffer size overflow"))?;
        if input.len() != expected || output.len() != expected {
            return Err(ShadowError::blur(
                "blur expects input and output matching width*height*4",
            ));
        }

        let radius = radius.min(self.max_radius);
        if radius == 0 || size.is_empty() {
            output.copy_from_slice(input);
            return Ok(());
        }

        let kernel = self.kernel(radius)?;
        self.scratch.resize(expected, 0);
        blur_pass(input, &mut self.scratch, size, &kernel, Axis::Horizontal);
        blur_pass(&self.scratch, output, size, &kernel, Axis::Vertical);
        Ok(())
    }
}

const Q16_ONE: i64 = 1 << 16;

fn kernel_q16(radius: u32, sigma: f32) -> ShadowResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ShadowError::blur("blur sigma must be finite and > 0"));
    }
    let reach = i64::from(radius);
    let two_sigma_sq = 2.0 * f64::from(sigma) * f64::from(sigma);
    let raw: Vec<f64> = (-reach..=reach)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let total: f64 = raw.iter().sum();

    let mut taps: Vec<u32> = raw
        .iter()
        .map(|w| ((w / total) * Q16_ONE as f64).round() as u32)
        .collect();
    // Center tap absorbs the rounding error so the taps sum to exactly Q16_ONE.
    let sum: i64 = taps.iter().map(|&t| i64::from(t)).sum();
    let mid = taps.len() / 2;
    taps[mid] = (i64::from(taps[mid]) + Q16_ONE - sum).clamp(0, Q16_ONE) as u32;
    Ok(taps)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One 1-D convolution of every row (or column) of `src` into `dst`, clamping at the edges.
fn blur_pass(src: &[u8], dst: &mut [u8], size: Size, taps: &[u32], axis: Axis) {
    let (w, h) = (size.width as usize, size.height as usize);
    let (line_len, stride) = match axis {
        Axis::Horizontal => (w, 1),
        Axis::Vertical => (h, w),
    };
    let last = line_len as i64 - 1;
    let reach = (taps.len() / 2) as i64;

    for y in 0..h {
        for x in 0..w {
            let pos = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let line_start = y * w + x - pos * stride;

            let mut acc = [0u64; 4];
            for (i, &tap) in taps.iter().enumerate() {
                let along = (pos as i64 + i as i64 - reach).clamp(0, last) as usize;
                let px = &src[(line_start + along * stride) * 4..][..4];
                for (a, &v) in acc.iter_mut().zip(px) {
                    *a += u64::from(tap) * u64::from(v);
                }
            }

            let out = &mut dst[(y * w + x) * 4..][..4];
            for (o, a) in out.iter_mut().zip(acc) {
                *o = ((a + (1 << 15)) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
