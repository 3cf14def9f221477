//! Full (non-separable) N×N convolution over 8-bit rasters.

use image::{ImageBuffer, Pixel};
use tracing::trace;

use crate::convolution::kernel::Kernel;
use crate::error::{RedEyeError, Result, invalid};

/// Convolve every channel of `source` with `kernel`.
///
/// Pixels closer than `kernel.radius()` to any border are not computed and
/// are left zero in the output. Each computed value is the weighted sum
/// divided by the kernel's total weight, rounded and clamped to `[0, 255]`.
///
/// # Errors
/// - [`RedEyeError::InvalidParameter`] if the image is smaller than the kernel
/// - [`RedEyeError::DegenerateComputation`] if the kernel weights sum to zero
pub fn convolve_2d<P>(
    source: &ImageBuffer<P, Vec<u8>>,
    kernel: &Kernel,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = source.dimensions();
    let size = kernel.size();
    if (width as usize) < size || (height as usize) < size {
        return Err(invalid(format!(
            "{width}x{height} image is smaller than a {size}x{size} kernel"
        )));
    }

    let ksum = kernel.sum();
    if ksum.abs() < f32::EPSILON {
        return Err(RedEyeError::DegenerateComputation(
            "kernel weights sum to zero",
        ));
    }

    let (w, h) = (width as usize, height as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let radius = kernel.radius();
    let src = source.as_raw();
    let mut dst = vec![0u8; src.len()];
    let mut acc = [0.0_f32; 4];

    for y in radius..h - radius {
        for x in radius..w - radius {
            acc.fill(0.0);
            for j in 0..size {
                let row = (y + radius - j) * w;
                for i in 0..size {
                    let k = kernel.at(i, j);
                    let base = (row + x + radius - i) * channels;
                    for (c, sum) in acc.iter_mut().take(channels).enumerate() {
                        *sum += k * src[base + c] as f32;
                    }
                }
            }

            let out = (y * w + x) * channels;
            for (c, sum) in acc.iter().take(channels).enumerate() {
                dst[out + c] = (sum / ksum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    trace!(width, height, size, "convolved raster");

    ImageBuffer::from_raw(width, height, dst).ok_or_else(|| {
        RedEyeError::InternalFailure("convolution buffer does not match raster size".into())
    })
}
