//! Client for the robot's camera and command socket.
//!
//! One TCP connection carries both one-way text commands and raw camera
//! frames. A frame is requested with `getImg`; the robot answers with exactly
//! as many packed YUV 4:2:2 bytes as the negotiated camera profile dictates,
//! which are decoded into a BGR `Tensor<u8>` of shape `[height, width, 3]`.

pub mod command;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod payload;
pub mod profile;

pub use command::Command;
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::PepperError;
pub use frame::{CommandSink, FrameSource, decode_frame};
pub use payload::read_payload;
pub use profile::{COLOR_SPACE_ID, CameraProfile};
