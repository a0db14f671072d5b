use base::Vec2;

fn pack_argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Pack an RGB color into the `0xAARRGGBB` layout minifb draws.
pub fn rgb_to_argb_pixel(rgb: [u8; 3]) -> u32 {
    pack_argb(rgb[0], rgb[1], rgb[2])
}

/// Pack interleaved BGR into minifb's `0xAARRGGBB` buffer.
pub fn bgr_to_u32(size: Vec2<usize>, data: &[u8]) -> Vec<u32> {
    let mut buf = Vec::with_capacity(size.area());
    for pixel in data.chunks_exact(3).take(size.area()) {
        buf.push(pack_argb(pixel[2], pixel[1], pixel[0]));
    }
    buf
}
