use {crate::*, base::Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 4:2:2, `[Y0, Cb, Y1, Cr]` per pixel pair.
    Yuv422,
    /// One `[Y, Cb, Cr]` triple per pixel.
    YCbCr,
    Rgb8,
    Bgr8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Yuv422 => 2,
            PixelFormat::YCbCr | PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
        }
    }

    /// Number of bytes one frame of `size` occupies in this format.
    pub fn frame_len(&self, size: Vec2<usize>) -> usize {
        size.area() * self.bytes_per_pixel()
    }

    /// Fail unless `data` holds at least one whole frame of `size`.
    pub fn ensure_frame(&self, size: Vec2<usize>, data: &[u8]) -> Result<(), ImageError> {
        let expected = self.frame_len(size);
        if data.len() < expected {
            return Err(ImageError::Decode(format!(
                "{:?} frame of {}x{} needs {} bytes, got {}",
                self,
                size.x,
                size.y,
                expected,
                data.len()
            )));
        }
        Ok(())
    }
}

// full-range (JFIF) YCbCr to RGB for a single pixel, fixed point with 8 fractional bits
pub(crate) fn ycbcr_pixel_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let cb = cb as i32 - 128;
    let cr = cr as i32 - 128;
    let r = (y + ((359 * cr) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * cb + 183 * cr) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * cb) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}
