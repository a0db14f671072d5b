use {
    crate::*,
    chrono::{Datelike, NaiveDateTime, Timelike},
    rand::Rng,
    std::{
        io,
        path::{Path, PathBuf},
    },
};

const MAX_ATTEMPTS: usize = 100;
const MAX_ID: u32 = 99_999_999;

/// Directory name for a session started at `now`, e.g. `2019_1_25_13_4_52_00012345`.
pub fn session_name(now: &NaiveDateTime, id: u32) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}_{:08}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        id
    )
}

/// Output directory of one calibration run.
#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    dir: PathBuf,
}

impl Session {
    /// Create a fresh session directory under `root`.
    ///
    /// A new random id is drawn whenever the name is taken, up to 100 times.
    pub fn create<R: Rng + ?Sized>(root: &Path, now: &NaiveDateTime, rng: &mut R) -> Result<Self, CalibrationError> {
        std::fs::create_dir_all(root)?;
        for _ in 0..MAX_ATTEMPTS {
            let name = session_name(now, rng.gen_range(0..MAX_ID));
            let dir = root.join(&name);
            match std::fs::create_dir(&dir) {
                Ok(()) => {
                    log::info!("session directory {}", dir.display());
                    return Ok(Self { name, dir });
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                    log::debug!("session {} exists, drawing a new id", name);
                }
                Err(error) => return Err(error.into()),
            }
        }
        Err(CalibrationError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free session directory in {} after {} attempts", root.display(), MAX_ATTEMPTS),
        )))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Prefix shared by every file of the session.
    pub fn prefix(&self) -> String {
        format!("{}_", self.name)
    }

    /// File name of frame `number`, counted from 1.
    pub fn frame_file_name(&self, number: u64) -> String {
        format!("{}{:05}.jpg", self.prefix(), number)
    }

    pub fn header_csv_path(&self) -> PathBuf {
        self.dir.join(format!("{}Header.csv", self.prefix()))
    }

    pub fn header_json_path(&self) -> PathBuf {
        self.dir.join(format!("{}Header.json", self.prefix()))
    }
}
