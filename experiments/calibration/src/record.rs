use {
    crate::*,
    serde::Serialize,
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::Path,
    },
};

/// Response value recorded when no arrow key arrives in time.
pub const NO_KEY: &str = "NoKey";

const CSV_COLUMNS: [&str; 12] = [
    "frameNr", "x", "y", "dotNr", "arrowOri", "Resp", "corrResp", "fName", "sampTime", "pc", "resX", "resY",
];

/// One captured frame and the stimulus on screen when it was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    #[serde(rename = "frameNr")]
    pub frame_nr: u64,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "dotNr")]
    pub dot_nr: usize,
    #[serde(rename = "arrowOri")]
    pub arrow_ori: String,
    #[serde(rename = "Resp")]
    pub resp: String,
    #[serde(rename = "corrResp")]
    pub corr_resp: bool,
    #[serde(rename = "fName")]
    pub f_name: String,
    #[serde(rename = "sampTime")]
    pub samp_time: f64,
}

/// Frame records of a session plus the machine and screen they came from.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderLog {
    pub pc: String,
    #[serde(rename = "resX")]
    pub res_x: usize,
    #[serde(rename = "resY")]
    pub res_y: usize,
    pub frames: Vec<FrameRecord>,
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

impl HeaderLog {
    pub fn new(pc: impl Into<String>, res_x: usize, res_y: usize) -> Self {
        Self {
            pc: pc.into(),
            res_x,
            res_y,
            frames: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.frames.push(record);
    }

    /// Fill in the response for every record from index `start` onwards.
    pub fn set_response(&mut self, start: usize, resp: &str, correct: bool) {
        for record in self.frames.iter_mut().skip(start) {
            record.resp = resp.to_string();
            record.corr_resp = correct;
        }
    }

    /// Comma separated, one header row, one row per frame.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), CalibrationError> {
        writeln!(writer, "{}", CSV_COLUMNS.join(","))?;
        let pc = csv_field(&self.pc);
        for record in &self.frames {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                record.frame_nr,
                record.x,
                record.y,
                record.dot_nr,
                csv_field(&record.arrow_ori),
                csv_field(&record.resp),
                csv_bool(record.corr_resp),
                csv_field(&record.f_name),
                record.samp_time,
                pc,
                self.res_x,
                self.res_y
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), CalibrationError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the CSV and JSON header files of `session`.
    pub fn save(&self, session: &Session) -> Result<(), CalibrationError> {
        self.save_to(&session.header_csv_path(), &session.header_json_path())
    }

    pub fn save_to(&self, csv_path: &Path, json_path: &Path) -> Result<(), CalibrationError> {
        self.write_csv(BufWriter::new(File::create(csv_path)?))?;
        let mut json = BufWriter::new(File::create(json_path)?);
        self.write_json(&mut json)?;
        json.flush()?;
        log::info!("wrote {} frame records to {}", self.frames.len(), csv_path.display());
        Ok(())
    }
}
