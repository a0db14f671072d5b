use std::fmt;

/// Text commands understood by the robot.
///
/// Commands are one-way: the robot never acknowledges them. Only `GetImg`
/// provokes a reply, the raw frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetImg,
    Say(String),
    Track(bool),
    Nod,
    /// Head pitch and yaw in radians.
    Head { pitch: f64, yaw: f64 },
    Idle,
    /// Gaze target in normalized image coordinates.
    Look { x: f64, y: f64 },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetImg => write!(f, "getImg"),
            Command::Say(text) => write!(f, "say {text}"),
            Command::Track(true) => write!(f, "track True"),
            Command::Track(false) => write!(f, "track False"),
            Command::Nod => write!(f, "nod"),
            Command::Head { pitch, yaw } => write!(f, "head {pitch:.2} {yaw:.2}"),
            Command::Idle => write!(f, "idle"),
            Command::Look { x, y } => write!(f, "look;{x:.5};{y:.5}"),
        }
    }
}

impl Command {
    /// UTF-8 bytes as written to the socket, without terminator.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}
