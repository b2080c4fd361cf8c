//! Test fixtures and constants.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Endpoint colors as RGBA with full alpha
pub mod colors {
    pub const SHADOW: [u8; 4] = [27, 96, 47, 255];
    pub const HIGHLIGHT: [u8; 4] = [247, 132, 197, 255];
}

fn encode(image: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).expect("encode fixture");
    out.into_inner()
}

/// Two pixels: black, then white
pub fn black_white_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    encode(DynamicImage::ImageRgba8(img), image::ImageFormat::Png)
}

/// Horizontal grey ramp with a vertical alpha ramp
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        let a = 255 - (y * 200 / height.max(1)) as u8;
        Rgba([v, v, v, a])
    });
    encode(DynamicImage::ImageRgba8(img), image::ImageFormat::Png)
}

/// One flat color
pub fn flat_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    encode(DynamicImage::ImageRgba8(img), image::ImageFormat::Png)
}

/// A small JPEG
pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgb([v, v / 2, 255 - v])
    });
    encode(DynamicImage::ImageRgb8(img), image::ImageFormat::Jpeg)
}

/// Bytes with a PNG signature and nothing decodable after it
pub fn corrupt_png() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(b"definitely not an IHDR chunk");
    bytes
}

pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
