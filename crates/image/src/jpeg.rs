use {
    crate::*,
    base::Vec2,
    crates_image::ImageEncoder,
    std::{fs, path::Path},
};

/// Encode an interleaved BGR frame as JPEG.
pub fn bgr_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    PixelFormat::Bgr8.ensure_frame(size, data)?;
    let rgb = bgr_to_rgb(&data[..PixelFormat::Bgr8.frame_len(size)]);

    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.write_image(
        &rgb,
        size.x as u32,
        size.y as u32,
        crates_image::ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

/// Encode a BGR frame and write it to `path`.
pub fn save_bgr_jpeg(
    path: impl AsRef<Path>,
    size: Vec2<usize>,
    data: &[u8],
    quality: u8,
) -> Result<(), ImageError> {
    let jpeg = bgr_to_jpeg(size, data, quality)?;
    fs::write(path, jpeg)?;
    Ok(())
}
