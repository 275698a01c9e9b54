//! JPEG thumbnail encoding with image-rs.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

/// Quality used when no override is configured.
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 80;

/// Decodes `data`, scales it so the longer edge equals `max_dimension`
/// (keeping the aspect ratio) and re-encodes it as JPEG.
///
/// CPU bound; call from a blocking context.
pub fn encode_thumbnail(data: &[u8], max_dimension: u32, quality: u8) -> anyhow::Result<Vec<u8>> {
    anyhow::ensure!(max_dimension > 0, "thumbnail dimension must be positive");

    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    let (w, h) = img.dimensions();
    anyhow::ensure!(w > 0 && h > 0, "image has no pixels");

    let scaled = img.resize(max_dimension, max_dimension, FilterType::Triangle);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([30, 120, 200, 255]),
    ));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode sample png");
    out
}
