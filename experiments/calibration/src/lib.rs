//! Gaze calibration session for the Pepper camera experiment.
//!
//! A participant fixates pulsing dots laid out on a grid and reports the
//! direction of an arrow shown after each dot, while frames from the robot's
//! camera are captured and tagged with the dot on screen. Screen and robot
//! are reached through the `Screen`, `FrameSource` and `CommandSink` traits.

pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod record;
pub mod schedule;
pub mod screen;
pub mod session;
pub mod trial;

pub use config::CalibrationConfig;
pub use error::CalibrationError;
pub use grid::{calibration_grid, make_square_grid};
pub use record::{FrameRecord, HeaderLog, NO_KEY};
pub use schedule::{Direction, ScheduledDot, build_schedule};
pub use screen::{Key, Screen};
pub use session::Session;
pub use trial::{Calibration, Phase, Pulse};
