//! Error taxonomy for the processing pipeline
//!
//! Hard failures abort the whole operation; purely numerical corner cases
//! (zero weight sums at borders, empty k-means clusters) are handled locally
//! with safe defaults and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixliftError {
    /// Input file exceeds the configured byte ceiling. Checked before any
    /// decoding work is attempted.
    #[error("input is {actual} bytes, over the {limit} byte limit")]
    InputTooLarge { actual: usize, limit: usize },

    /// The input bytes are not one of the supported container formats.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The container was recognized but could not be decoded.
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    /// A buffer was constructed or requested with an impossible geometry.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The running memory estimate crossed the hard ceiling mid-run.
    #[error("estimated working set of {estimated} bytes exceeds the {limit} byte budget")]
    MemoryLimitExceeded { estimated: usize, limit: usize },

    /// The output buffer could not be encoded to the requested format.
    #[error("failed to encode image: {0}")]
    EncodeFailure(String),

    /// The cancellation token was set; observed at a tile or stage boundary.
    #[error("operation cancelled")]
    Cancelled,
}
