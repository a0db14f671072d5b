use {crate::PepperError, base::Vec2};

/// Colour space identifier the robot-side capture uses for every profile.
pub const COLOR_SPACE_ID: u8 = 13;

/// One supported robot camera mode.
///
/// The payload size is agreed out of band; it never travels on the wire, so
/// both ends must pick the same profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProfile {
    id: u8,
    payload_size: usize,
    size: Vec2<usize>,
    camera_id: u8,
    resolution_id: u8,
}

const fn profile(
    id: u8,
    payload_size: usize,
    width: usize,
    height: usize,
    camera_id: u8,
    resolution_id: u8,
) -> CameraProfile {
    CameraProfile {
        id,
        payload_size,
        size: Vec2::new(width, height),
        camera_id,
        resolution_id,
    }
}

const PROFILES: [CameraProfile; 6] = [
    // stereo
    profile(1, 921_600, 1280, 360, 3, 14),
    profile(2, 3_686_400, 2560, 720, 3, 13),
    // mono
    profile(3, 153_600, 320, 240, 0, 1),
    profile(4, 614_400, 640, 480, 0, 2),
    profile(5, 2_457_600, 1280, 960, 0, 3),
    profile(6, 9_830_400, 1280, 960, 0, 3),
];

impl CameraProfile {
    /// Look up a profile by id, failing for anything outside the table.
    pub fn from_id(id: u8) -> Result<Self, PepperError> {
        PROFILES
            .iter()
            .find(|profile| profile.id == id)
            .copied()
            .ok_or(PepperError::UnsupportedProfile(id))
    }

    pub fn all() -> &'static [CameraProfile] {
        &PROFILES
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// Bytes the robot sends in answer to one `getImg`.
    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn camera_id(&self) -> u8 {
        self.camera_id
    }

    pub fn resolution_id(&self) -> u8 {
        self.resolution_id
    }
}

impl Default for CameraProfile {
    fn default() -> Self {
        PROFILES[3]
    }
}
