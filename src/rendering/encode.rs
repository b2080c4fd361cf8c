use std::io::Cursor;

use duotone_core::PixelBuffer;

use crate::error::ProcessError;

/// Encode an RGBA buffer as an 8-bit RGBA PNG.
///
/// With `optimize` set, the fast encode is re-compressed by oxipng. If oxipng
/// fails the unoptimized bytes are returned.
pub fn encode_png(buffer: &PixelBuffer, optimize: bool) -> Result<Vec<u8>, ProcessError> {
    let compression = if optimize {
        png::Compression::Fast
    } else {
        png::Compression::Default
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    let options = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        ..Default::default()
    };
    match oxipng::optimize_from_memory(&png_bytes, &options) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Recompressed PNG"
            );
            Ok(optimized)
        }
        Err(e) => {
            tracing::warn!(error = %e, "PNG optimization failed, using unoptimized output");
            Ok(png_bytes)
        }
    }
}
