//! Test fixtures: small encoded images.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 90])
    })
}

pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .expect("Failed to encode fixture");
    bytes
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

/// A PNG cut off halfway through its image data.
pub fn truncated_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = png(width, height);
    bytes.truncate(bytes.len() / 2);
    bytes
}
