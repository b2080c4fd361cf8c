//! Owned RGBA pixel buffer with dimension metadata.

use crate::error::EngineError;
use crate::planner::Dimensions;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 pixels with their dimensions.
///
/// Construction checks that both extents are non-zero and that the byte
/// length is exactly `width * height * 4`, so a `PixelBuffer` is always a
/// valid input for [`transform`](crate::transform()).
///
/// # Example
///
/// ```
/// use duotone_core::PixelBuffer;
///
/// let buffer = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 128]).unwrap();
/// assert_eq!(buffer.pixel(1, 0), [255, 255, 255, 128]);
///
/// // 2x2 needs 16 bytes
/// assert!(PixelBuffer::new(2, 2, vec![0; 12]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ZeroDimension`] if `width` or `height` is zero
    /// - [`EngineError::TooLarge`] if the byte count overflows `usize`
    /// - [`EngineError::SizeMismatch`] if `data.len() != width * height * 4`
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EngineError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(EngineError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, EngineError> {
        let len = byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// Always false; zero-sized buffers cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the bytes. The length cannot change through a slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::ZeroDimension { width, height });
    }
    Dimensions::new(width, height)
        .pixel_count()
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(EngineError::TooLarge { width, height })
}
