//! Convolution engine: kernel generation, full 2-D convolution, and the
//! separable integer blur.
//!
//! The two convolutions treat borders differently on purpose:
//! [`convolve_2d`] leaves a margin of `kernel.radius()` pixels uncomputed,
//! while [`separable_blur`] renormalizes its weights at the edges.

pub mod convolve;
pub mod kernel;
pub mod separable;

pub use convolve::convolve_2d;
pub use kernel::Kernel;
pub use separable::{
    FilterVector, MAX_BLUR_RADIUS, MAX_UNSHARP_DEPTH, separable_blur, unsharp_mask,
};
