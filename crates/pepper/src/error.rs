use std::{fmt, io, time::Duration};

#[derive(Debug)]
pub enum PepperError {
    Connect { address: String, source: io::Error },
    ConnectionClosed { received: usize, expected: usize },
    Timeout(Duration),
    UnsupportedProfile(u8),
    Decode(String),
    Image(image::ImageError),
    Io(io::Error),
    NotConnected,
    Config(String),
}

impl fmt::Display for PepperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PepperError::Connect { address, source } => {
                write!(f, "failed to connect to {address}: {source}")
            }
            PepperError::ConnectionClosed { received, expected } => write!(
                f,
                "connection closed after {received} of {expected} payload bytes"
            ),
            PepperError::Timeout(after) => {
                write!(f, "no data received for {} ms", after.as_millis())
            }
            PepperError::UnsupportedProfile(id) => {
                write!(f, "unsupported camera profile {id}, expected 1 to 6")
            }
            PepperError::Decode(msg) => write!(f, "decode error: {msg}"),
            PepperError::Image(err) => write!(f, "image error: {err}"),
            PepperError::Io(err) => write!(f, "io error: {err}"),
            PepperError::NotConnected => write!(f, "connection already closed"),
            PepperError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for PepperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PepperError::Connect { source, .. } => Some(source),
            PepperError::Image(err) => Some(err),
            PepperError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PepperError {
    fn from(err: io::Error) -> Self {
        PepperError::Io(err)
    }
}

impl From<image::ImageError> for PepperError {
    fn from(err: image::ImageError) -> Self {
        PepperError::Image(err)
    }
}

impl From<base::TensorError> for PepperError {
    fn from(err: base::TensorError) -> Self {
        PepperError::Image(image::ImageError::Tensor(err))
    }
}
