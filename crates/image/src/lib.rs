//! Pixel conversions for frames streamed by the robot.
//!
//! Raw frames arrive as packed YUV 4:2:2. They are expanded to one YCbCr
//! triple per pixel, converted to RGB and finally reordered to BGR, which is
//! the order the display and storage paths expect. All interleaved buffers
//! use HWC layout.

mod error;
pub use error::*;

mod pixelformat;
pub use pixelformat::*;

mod ycbcr;
pub use ycbcr::*;

mod bgr;
pub use bgr::*;

mod jpeg;
pub use jpeg::*;

mod argb;
pub use argb::*;
