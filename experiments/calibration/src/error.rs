use {pepper::PepperError, std::fmt};

#[derive(Debug)]
pub enum CalibrationError {
    Pepper(PepperError),
    Image(image::ImageError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Display(String),
    UnsupportedPointCount(usize),
    Aborted,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::Pepper(err) => write!(f, "robot error: {err}"),
            CalibrationError::Image(err) => write!(f, "image error: {err}"),
            CalibrationError::Io(err) => write!(f, "io error: {err}"),
            CalibrationError::Json(err) => write!(f, "json error: {err}"),
            CalibrationError::Display(msg) => write!(f, "display error: {msg}"),
            CalibrationError::UnsupportedPointCount(count) => {
                write!(f, "unsupported number of calibration points: {count} (use 9, 12 or 15)")
            }
            CalibrationError::Aborted => write!(f, "session aborted by participant"),
        }
    }
}

impl std::error::Error for CalibrationError {}

impl From<PepperError> for CalibrationError {
    fn from(err: PepperError) -> Self {
        CalibrationError::Pepper(err)
    }
}

impl From<image::ImageError> for CalibrationError {
    fn from(err: image::ImageError) -> Self {
        CalibrationError::Image(err)
    }
}

impl From<std::io::Error> for CalibrationError {
    fn from(err: std::io::Error) -> Self {
        CalibrationError::Io(err)
    }
}

impl From<serde_json::Error> for CalibrationError {
    fn from(err: serde_json::Error) -> Self {
        CalibrationError::Json(err)
    }
}

impl From<minifb::Error> for CalibrationError {
    fn from(err: minifb::Error) -> Self {
        CalibrationError::Display(err.to_string())
    }
}
