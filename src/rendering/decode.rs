//! Source decoding and resampling.
//!
//! Uploads are decoded with the `image` crate, rotated upright according to
//! their EXIF orientation and converted to 8-bit RGBA before the duotone
//! engine sees them.

use std::io::Cursor;

use duotone_core::{Dimensions, EngineError};
use image::{imageops::FilterType, DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::error::ProcessError;
use crate::models::ImageFormat;

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Decode an upload into an upright RGBA image.
///
/// A missing or unreadable orientation tag is treated as "no rotation".
pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<RgbaImage, ProcessError> {
    let reader = ImageReader::with_format(Cursor::new(bytes), format.into());
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ProcessError::Decode(e.to_string()))?;

    let orientation = match decoder.orientation() {
        Ok(orientation) => Some(orientation),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable orientation metadata");
            None
        }
    };

    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|e| ProcessError::Decode(e.to_string()))?;
    if let Some(orientation) = orientation {
        image.apply_orientation(orientation);
    }

    let rgba = image.into_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(EngineError::ZeroDimension {
            width: rgba.width(),
            height: rgba.height(),
        }
        .into());
    }
    Ok(rgba)
}

/// Resample to the planned working size with a Lanczos3 filter.
///
/// Images already at the target size are returned untouched.
pub fn resample(image: RgbaImage, target: Dimensions) -> RgbaImage {
    if image.width() == target.width && image.height() == target.height {
        return image;
    }
    tracing::debug!(
        from_width = image.width(),
        from_height = image.height(),
        to_width = target.width,
        to_height = target.height,
        "Resampling source"
    );
    image::imageops::resize(&image, target.width, target.height, FilterType::Lanczos3)
}
