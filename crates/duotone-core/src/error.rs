//! Error type for the duotone engine.
//!
//! Every variant describes a precondition the caller failed to meet. None of
//! them is transient: retrying with the same input fails the same way.

use std::fmt;

/// Invalid input handed to the planner or the transform engine.
///
/// # Example
///
/// ```
/// use duotone_core::{plan, EngineError};
///
/// let err = plan(0, 480).unwrap_err();
/// assert_eq!(err, EngineError::ZeroDimension { width: 0, height: 480 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The pixel buffer holds no bytes.
    EmptyBuffer,
    /// The buffer length is not a multiple of four (RGBA).
    MisalignedBuffer {
        /// Length of the rejected buffer in bytes
        len: usize,
    },
    /// Width or height is zero.
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// The byte length does not match `width * height * 4`.
    SizeMismatch {
        /// Bytes required by the declared dimensions
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
    /// `width * height * 4` does not fit in memory on this platform.
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyBuffer => write!(f, "pixel buffer is empty"),
            EngineError::MisalignedBuffer { len } => {
                write!(
                    f,
                    "pixel buffer length {} is not a multiple of 4 (RGBA)",
                    len
                )
            }
            EngineError::ZeroDimension { width, height } => {
                write!(f, "image dimensions must be positive, got {}x{}", width, height)
            }
            EngineError::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} bytes, dimensions require {}",
                    actual, expected
                )
            }
            EngineError::TooLarge { width, height } => {
                write!(f, "image dimensions {}x{} are too large", width, height)
            }
        }
    }
}

impl std::error::Error for EngineError {}
