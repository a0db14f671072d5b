/// Reorder interleaved RGB to BGR in place.
pub fn rgb_to_bgr(mut data: Vec<u8>) -> Vec<u8> {
    data.chunks_exact_mut(3).for_each(|pixel| pixel.swap(0, 2));
    data
}

/// Reorder interleaved BGR to RGB. The swap is its own inverse.
pub fn bgr_to_rgb(data: &[u8]) -> Vec<u8> {
    rgb_to_bgr(data.to_vec())
}
