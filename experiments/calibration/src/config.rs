use {
    base::Vec2,
    std::{path::PathBuf, time::Duration},
};

const DEFAULT_POINTS: usize = 15;
const DEFAULT_FRAMES_PER_DOT: usize = 5;
const DEFAULT_SETTLE_MS: u64 = 1000;
const DEFAULT_SAMPLE_DURATION_MS: u64 = 2000;
const DEFAULT_ARROW_MS: u64 = 150;
const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 1000;
const DEFAULT_FEEDBACK_MS: u64 = 250;
const DEFAULT_BREAK_PAUSE_MS: u64 = 500;
const DEFAULT_TRAINING_REPEATS: usize = 1;
const DEFAULT_EXPERIMENT_REPEATS: usize = 18;
const DEFAULT_SCREEN: Vec2<usize> = Vec2::new(1280, 720);
const DEFAULT_JPEG_QUALITY: u8 = 95;
const DEFAULT_RADIUS_STEP: f32 = 0.75;

/// Environment variable holding the machine label written into the header log.
pub const PC_VAR: &str = "PEPPER_PC";

/// Environment variable holding the screen size as `<width>x<height>`.
pub const SCREEN_VAR: &str = "PEPPER_SCREEN";

/// Environment variable holding the number of calibration points.
pub const POINTS_VAR: &str = "PEPPER_POINTS";

/// Timing, layout and output settings of one calibration session.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    n_points: usize,
    frames_per_dot: usize,
    settle: Duration,
    sample_duration: Duration,
    arrow_duration: Duration,
    response_timeout: Duration,
    feedback_duration: Duration,
    break_pause: Duration,
    training_repeats: usize,
    experiment_repeats: usize,
    pc: String,
    screen: Vec2<usize>,
    jpeg_quality: u8,
    radius_step: f32,
    output_root: PathBuf,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            n_points: DEFAULT_POINTS,
            frames_per_dot: DEFAULT_FRAMES_PER_DOT,
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            sample_duration: Duration::from_millis(DEFAULT_SAMPLE_DURATION_MS),
            arrow_duration: Duration::from_millis(DEFAULT_ARROW_MS),
            response_timeout: Duration::from_millis(DEFAULT_RESPONSE_TIMEOUT_MS),
            feedback_duration: Duration::from_millis(DEFAULT_FEEDBACK_MS),
            break_pause: Duration::from_millis(DEFAULT_BREAK_PAUSE_MS),
            training_repeats: DEFAULT_TRAINING_REPEATS,
            experiment_repeats: DEFAULT_EXPERIMENT_REPEATS,
            pc: DEFAULT_PC.to_string(),
            screen: DEFAULT_SCREEN,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            radius_step: DEFAULT_RADIUS_STEP,
            output_root: PathBuf::from("."),
        }
    }
}

const DEFAULT_PC: &str = "default";

/// First non-empty candidate, trimmed, or `"default"`.
pub fn pick_machine_label<I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PC.to_string())
}

/// Name of this machine, used as the header log's `pc` label.
pub fn machine_label() -> String {
    pick_machine_label([
        std::env::var("HOSTNAME").ok(),
        std::env::var("COMPUTERNAME").ok(),
        std::fs::read_to_string("/etc/hostname").ok(),
    ])
}

/// Parse `1920x1080` into a size.
pub fn parse_screen(value: &str) -> Option<Vec2<usize>> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w = w.parse::<usize>().ok().filter(|&w| w > 0)?;
    let h = h.parse::<usize>().ok().filter(|&h| h > 0)?;
    Some(Vec2::new(w, h))
}

impl CalibrationConfig {
    /// Defaults overridden by `PEPPER_PC`, `PEPPER_SCREEN` and `PEPPER_POINTS`.
    /// Without `PEPPER_PC` the `pc` label is the machine's host name.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.pc = match std::env::var(PC_VAR) {
            Ok(pc) => pc,
            Err(_) => machine_label(),
        };
        if let Ok(value) = std::env::var(SCREEN_VAR) {
            match parse_screen(&value) {
                Some(screen) => config.screen = screen,
                None => log::warn!("ignoring {}={:?}, expected <width>x<height>", SCREEN_VAR, value),
            }
        }
        if let Ok(value) = std::env::var(POINTS_VAR) {
            match value.trim().parse() {
                Ok(n_points) => config.n_points = n_points,
                Err(_) => log::warn!("ignoring {}={:?}, expected 9, 12 or 15", POINTS_VAR, value),
            }
        }
        config
    }

    pub fn with_n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    pub fn with_frames_per_dot(mut self, frames: usize) -> Self {
        self.frames_per_dot = frames;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_sample_duration(mut self, duration: Duration) -> Self {
        self.sample_duration = duration;
        self
    }

    pub fn with_arrow_duration(mut self, duration: Duration) -> Self {
        self.arrow_duration = duration;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_feedback_duration(mut self, duration: Duration) -> Self {
        self.feedback_duration = duration;
        self
    }

    pub fn with_break_pause(mut self, pause: Duration) -> Self {
        self.break_pause = pause;
        self
    }

    pub fn with_training_repeats(mut self, repeats: usize) -> Self {
        self.training_repeats = repeats;
        self
    }

    pub fn with_experiment_repeats(mut self, repeats: usize) -> Self {
        self.experiment_repeats = repeats;
        self
    }

    pub fn with_pc(mut self, pc: impl Into<String>) -> Self {
        self.pc = pc.into();
        self
    }

    pub fn with_screen(mut self, screen: Vec2<usize>) -> Self {
        self.screen = screen;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Zero every pause and delay. Used for headless runs.
    pub fn without_delays(self) -> Self {
        self.with_settle(Duration::ZERO)
            .with_sample_duration(Duration::ZERO)
            .with_arrow_duration(Duration::ZERO)
            .with_response_timeout(Duration::ZERO)
            .with_feedback_duration(Duration::ZERO)
            .with_break_pause(Duration::ZERO)
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn frames_per_dot(&self) -> usize {
        self.frames_per_dot
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn sample_duration(&self) -> Duration {
        self.sample_duration
    }

    pub fn arrow_duration(&self) -> Duration {
        self.arrow_duration
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    pub fn feedback_duration(&self) -> Duration {
        self.feedback_duration
    }

    pub fn break_pause(&self) -> Duration {
        self.break_pause
    }

    pub fn training_repeats(&self) -> usize {
        self.training_repeats
    }

    pub fn experiment_repeats(&self) -> usize {
        self.experiment_repeats
    }

    pub fn pc(&self) -> &str {
        &self.pc
    }

    pub fn screen(&self) -> Vec2<usize> {
        self.screen
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn radius_step(&self) -> f32 {
        self.radius_step
    }

    pub fn output_root(&self) -> &std::path::Path {
        &self.output_root
    }

    // Dot and arrow geometry scales with the screen width.

    pub fn dot_radius(&self) -> f32 {
        self.screen.x as f32 / 75.0
    }

    pub fn max_dot_radius(&self) -> f32 {
        self.screen.x as f32 / 60.0
    }

    pub fn min_dot_radius(&self) -> f32 {
        self.screen.x as f32 / 300.0
    }

    pub fn inner_dot_radius(&self) -> f32 {
        self.screen.x as f32 / 500.0
    }

    pub fn arrow_width(&self) -> f32 {
        self.screen.x as f32 / 60.0
    }
}
