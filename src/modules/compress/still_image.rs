//! Single-pass resize and re-encode for still images.

use crate::common::error::CompressError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ImageProfile {
    /// Output width as a percentage of the input width.
    pub scale_percent: u32,
    pub jpeg_quality: u8,
}

/// Target size for a shrink to `scale_percent` of the width.
///
/// Width rounds down, height rounds to nearest to keep the aspect ratio.
/// Neither goes below one pixel.
pub fn target_dimensions(width: u32, height: u32, scale_percent: u32) -> (u32, u32) {
    let new_width = ((width as u64 * scale_percent as u64) / 100).max(1);
    let new_height = ((height as u64 * new_width) as f64 / width.max(1) as f64).round() as u64;
    (new_width as u32, new_height.max(1) as u32)
}

/// Decodes `input`, shrinks it and writes it to `output` in the same format.
///
/// Returns the detected format. Blocking; call from `spawn_blocking`.
pub fn compress_image(
    input: &Path,
    output: &Path,
    profile: ImageProfile,
) -> Result<ImageFormat, CompressError> {
    let reader = ImageReader::open(input)
        .map_err(|e| CompressError::Decode(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| CompressError::Decode(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| CompressError::Decode("unrecognized image data".to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| CompressError::Decode(e.to_string()))?;

    let (width, height) = img.dimensions();
    let (new_width, new_height) = target_dimensions(width, height, profile.scale_percent);
    debug!(
        ?format,
        from = %format!("{width}x{height}"),
        to = %format!("{new_width}x{new_height}"),
        "Resizing image"
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    encode(&resized, format, output, profile)?;

    Ok(format)
}

fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    output: &Path,
    profile: ImageProfile,
) -> Result<(), CompressError> {
    // Checked before the file is created so an unsupported format leaves nothing behind.
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(CompressError::UnsupportedFormat(format!("{format:?}")));
    }

    let file = File::create(output).map_err(CompressError::Storage)?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut writer, profile.jpeg_quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| CompressError::Encode(e.to_string()))?;
        }
        _ => {
            let encoder =
                PngEncoder::new_with_quality(&mut writer, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder)
                .map_err(|e| CompressError::Encode(e.to_string()))?;
        }
    }

    writer.flush().map_err(CompressError::Storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    const PROFILE: ImageProfile = ImageProfile {
        scale_percent: 75,
        jpeg_quality: 85,
    };

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        })
    }

    #[test]
    fn width_rounds_down_height_keeps_ratio() {
        assert_eq!(target_dimensions(400, 300, 75), (300, 225));
        assert_eq!(target_dimensions(101, 50, 75), (75, 37));
        assert_eq!(target_dimensions(10, 7, 50), (5, 4));
        assert_eq!(target_dimensions(640, 480, 100), (640, 480));
    }

    #[test]
    fn tiny_images_stay_at_least_one_pixel() {
        assert_eq!(target_dimensions(1, 1, 75), (1, 1));
        assert_eq!(target_dimensions(3, 1000, 10), (1, 333));
        assert_eq!(target_dimensions(1000, 1, 50), (500, 1));
    }

    #[test]
    fn jpeg_is_shrunk_and_stays_jpeg() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.jpg");
        let output = dir.path().join("out.jpg");
        gradient(200, 100).save_with_format(&input, ImageFormat::Jpeg).unwrap();

        let format = compress_image(&input, &output, PROFILE).unwrap();

        assert_eq!(format, ImageFormat::Jpeg);
        let out = image::open(&output).unwrap();
        assert_eq!(out.dimensions(), (150, 75));
        assert_eq!(image::guess_format(&std::fs::read(&output).unwrap()).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn png_keeps_alpha() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        RgbaImage::from_pixel(40, 20, Rgba([10, 20, 30, 100]))
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();

        compress_image(&input, &output, PROFILE).unwrap();

        let out = image::open(&output).unwrap();
        assert_eq!(out.dimensions(), (30, 15));
        assert!(out.color().has_alpha());
    }

    #[test]
    fn format_comes_from_content_not_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("actually-png.jpg");
        let output = dir.path().join("out.jpg");
        gradient(20, 20).save_with_format(&input, ImageFormat::Png).unwrap();

        assert_eq!(compress_image(&input, &output, PROFILE).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn corrupt_input_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.png");
        let output = dir.path().join("out.png");
        let mut bytes = Vec::new();
        gradient(50, 50)
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes.truncate(bytes.len() / 2);
        std::fs::write(&input, &bytes).unwrap();

        let err = compress_image(&input, &output, PROFILE).unwrap_err();
        assert!(matches!(err, CompressError::Decode(_)), "{err:?}");
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("noise.jpg");
        std::fs::write(&input, b"definitely not an image").unwrap();

        let err = compress_image(&input, &dir.path().join("out.jpg"), PROFILE).unwrap_err();
        assert!(matches!(err, CompressError::Decode(_)));
    }

    #[test]
    fn decodable_but_not_encodable_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.bmp");
        let output = dir.path().join("out.bmp");
        gradient(16, 16).save_with_format(&input, ImageFormat::Bmp).unwrap();

        let err = compress_image(&input, &output, PROFILE).unwrap_err();
        assert!(matches!(err, CompressError::UnsupportedFormat(_)));
        assert!(!output.exists());
    }
}
