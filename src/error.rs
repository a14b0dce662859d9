//! The error type returned by the fallible parts of the crate.

use thiserror::Error;

/// An error that prevents a palette from being generated.
///
/// Conditions internal to k-means (e.g., a cluster losing all of its members)
/// are handled locally and are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input image has no pixels.
    #[error("the input image has no pixels")]
    EmptyInput,
    /// A pipeline setting is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The length of a pixel buffer does not match its dimensions.
    #[error("expected a buffer of {expected} components but got {actual}")]
    BufferSize {
        /// The number of components implied by the width, height, and channel count.
        expected: u64,
        /// The actual length of the buffer.
        actual: u64,
    },
    /// The image is larger than [`MAX_PIXELS`](crate::MAX_PIXELS).
    #[error("above the maximum image size of {} pixels", crate::MAX_PIXELS)]
    AboveMaxPixels,
    /// A hex color string could not be parsed.
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
}
