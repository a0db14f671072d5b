use {crate::*, base::Vec2};

/// Expand packed YUV 4:2:2 into one `[Y, Cb, Cr]` triple per pixel.
///
/// Luma sits on every even byte, Cb on every fourth byte from offset 1 and Cr
/// on every fourth byte from offset 3. Both chroma samples of a macro-pixel are
/// copied to the two pixels it covers, so the output satisfies
/// `out[0::3] = y`, `out[1::6] = out[4::6] = cb` and `out[2::6] = out[5::6] = cr`.
///
/// Pixels are paired along the flattened row-major stream. Only the leading
/// `2 * width * height` bytes of `data` are read.
pub fn yuv422_to_ycbcr(size: Vec2<usize>, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    PixelFormat::Yuv422.ensure_frame(size, data)?;
    let pixel_count = size.area();
    if pixel_count % 2 != 0 {
        return Err(ImageError::Decode(format!(
            "YUV422 needs an even pixel count, got {}x{}",
            size.x, size.y
        )));
    }

    let mut ycbcr = vec![0u8; pixel_count * 3];
    for (out, macro_pixel) in ycbcr
        .chunks_exact_mut(6)
        .zip(data[..pixel_count * 2].chunks_exact(4))
    {
        let (y0, cb, y1, cr) = (macro_pixel[0], macro_pixel[1], macro_pixel[2], macro_pixel[3]);
        out.copy_from_slice(&[y0, cb, cr, y1, cb, cr]);
    }

    Ok(ycbcr)
}

/// Convert per-pixel `[Y, Cb, Cr]` triples to `[R, G, B]`.
pub fn ycbcr_to_rgb(size: Vec2<usize>, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    PixelFormat::YCbCr.ensure_frame(size, data)?;
    let mut rgb = Vec::with_capacity(size.area() * 3);
    for pixel in data[..size.area() * 3].chunks_exact(3) {
        let (r, g, b) = ycbcr_pixel_to_rgb(pixel[0], pixel[1], pixel[2]);
        rgb.extend_from_slice(&[r, g, b]);
    }
    Ok(rgb)
}

/// Packed YUV 4:2:2 straight to BGR, the full robot frame pipeline.
pub fn yuv422_to_bgr(size: Vec2<usize>, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    let ycbcr = yuv422_to_ycbcr(size, data)?;
    let rgb = ycbcr_to_rgb(size, &ycbcr)?;
    Ok(rgb_to_bgr(rgb))
}
