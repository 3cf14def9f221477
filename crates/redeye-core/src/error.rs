//! Error kinds shared by the color, convolution, blob, and pipeline modules.

/// Everything that can go wrong while detecting or correcting red eye.
#[derive(Debug, thiserror::Error)]
pub enum RedEyeError {
    /// A caller-supplied value is outside the range an operation accepts
    /// (kernel larger than the image, color component outside `[0, 1]`,
    /// malformed blur radius, mismatched raster sizes).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A computation hit a zero or negative denominator.
    #[error("degenerate computation: {0}")]
    DegenerateComputation(&'static str),
    /// Internal state that should be impossible, e.g. an island whose seed
    /// pixel no longer carries its label.
    #[error("internal failure: {0}")]
    InternalFailure(String),
    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RedEyeError>;

pub(crate) fn invalid(message: impl Into<String>) -> RedEyeError {
    RedEyeError::InvalidParameter(message.into())
}
