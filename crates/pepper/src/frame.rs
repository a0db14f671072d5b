use {
    crate::*,
    base::{Tensor, Vec2},
    image::PixelFormat,
};

/// Anything that hands out decoded BGR frames of shape `[height, width, 3]`.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Fetch the next frame, waiting as long as the source needs.
    async fn frame(&mut self) -> Result<Tensor<u8>, PepperError>;

    /// Frame dimensions as width and height.
    fn frame_size(&self) -> Vec2<usize>;
}

/// Anything that accepts one-way robot commands.
#[allow(async_fn_in_trait)]
pub trait CommandSink {
    async fn send_command(&mut self, command: &Command) -> Result<(), PepperError>;
}

/// Decode one raw camera payload into a BGR tensor `[height, width, 3]`.
///
/// The payload must be exactly `profile.payload_size()` bytes. Profiles whose
/// payload is larger than one packed frame decode the leading frame only.
pub fn decode_frame(profile: &CameraProfile, payload: &[u8]) -> Result<Tensor<u8>, PepperError> {
    if payload.len() != profile.payload_size() {
        return Err(PepperError::Decode(format!(
            "camera profile {} expects {} payload bytes, got {}",
            profile.id(),
            profile.payload_size(),
            payload.len()
        )));
    }

    let size = profile.size();
    let frame_len = PixelFormat::Yuv422.frame_len(size);
    if payload.len() > frame_len {
        log::debug!(
            "profile {}: ignoring {} bytes after the {}x{} frame",
            profile.id(),
            payload.len() - frame_len,
            size.x,
            size.y
        );
    }

    let bgr = image::yuv422_to_bgr(size, payload)?;
    Ok(Tensor::new(vec![size.y, size.x, 3], bgr)?)
}
