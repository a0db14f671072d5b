use {
    crate::*,
    base::Vec2,
    std::{fmt, time::Duration},
};

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Left,
    Right,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Space => "space",
            Key::Escape => "escape",
            Key::Left => "left",
            Key::Right => "right",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session draws stimuli and reads the participant's keys.
///
/// Coordinates are in pixels with the origin at the screen center and y
/// pointing up. Drawing goes to a back buffer that `flip` presents and then
/// clears to the background.
pub trait Screen {
    fn size(&self) -> Vec2<usize>;

    /// Fixation dot: a filled circle with a small background-colored center.
    fn draw_dot(&mut self, center: Vec2<f32>, radius: f32, color: [u8; 3]);

    fn draw_arrow(&mut self, center: Vec2<f32>, direction: Direction, color: [u8; 3]);

    /// Present the back buffer. Returns seconds since the screen was opened.
    fn flip(&mut self) -> Result<f64, CalibrationError>;

    /// Show an instruction and present it.
    fn show_text(&mut self, text: &str) -> Result<(), CalibrationError>;

    /// Earliest key among `allowed` pressed since the last check, without waiting.
    fn poll_key(&mut self, allowed: &[Key]) -> Option<Key>;

    /// Wait for a key in `allowed` or escape. `None` waits forever;
    /// otherwise returns `Ok(None)` once `timeout` passes without one.
    fn wait_key(&mut self, allowed: &[Key], timeout: Option<Duration>) -> Result<Option<Key>, CalibrationError>;
}
