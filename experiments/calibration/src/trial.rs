use {
    crate::*,
    base::{Tensor, Vec2},
    pepper::{Command, CommandSink, FrameSource},
    rand::Rng,
    std::time::{Duration, Instant},
};

const DOT_COLOR: [u8; 3] = [255, 255, 255];
const ARROW_COLOR: [u8; 3] = [255, 255, 255];
const CORRECT_COLOR: [u8; 3] = [0, 255, 0];
const WRONG_COLOR: [u8; 3] = [255, 0, 0];

const START_PITCH: f64 = -0.3;

// head pitch applied when the participant moves to a standing position
const POSITION_PITCH: [(usize, f64); 2] = [(4, 0.2), (7, 0.1)];

const TRAINING_TEXT: [&str; 3] = [
    "Training! dots will appear on the screen, one after the other in random order [space]",
    "You must look at them and select the correct arrow direction [space]",
    "Stand at the position #1 and press [space] to start the training",
];
const TRAINING_DONE_TEXT: &str =
    "Good job :) !! Your training is finished. Now you are ready to start the experiment. Press space to start";
const EXPERIMENT_TEXT: &str = "Press space to start calibration!";
const EXPERIMENT_DONE_TEXT: &str =
    "Thanks for your attention :) !! The experiment is ended. Now you can take a break and ask any question you want";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Practice run, frames are requested but neither stored nor logged.
    Training,
    Experiment,
}

/// Dot radius oscillating between a lower and an upper bound.
///
/// The direction of travel carries over from one dot to the next; only the
/// radius is reset.
#[derive(Debug, Clone)]
pub struct Pulse {
    radius: f32,
    step: f32,
    step_size: f32,
    min: f32,
    max: f32,
}

impl Pulse {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            radius: config.dot_radius(),
            step: -config.radius_step(),
            step_size: config.radius_step(),
            min: config.min_dot_radius(),
            max: config.max_dot_radius(),
        }
    }

    pub fn reset(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Radius for the next refresh.
    pub fn advance(&mut self) -> f32 {
        if self.radius > self.max {
            self.step = -self.step_size;
        } else if self.radius < self.min {
            self.step = self.step_size;
        }
        self.radius += self.step;
        self.radius
    }
}

/// One calibration session: a training phase followed by the experiment.
///
/// Frame records of the experiment phase accumulate in a `HeaderLog` that
/// stays available when the run ends early.
pub struct Calibration<'a, S, R> {
    screen: &'a mut S,
    robot: &'a mut R,
    config: &'a CalibrationConfig,
    session: &'a Session,
    log: HeaderLog,
    pulse: Pulse,
}

impl<'a, S: Screen, R: FrameSource + CommandSink> Calibration<'a, S, R> {
    pub fn new(screen: &'a mut S, robot: &'a mut R, config: &'a CalibrationConfig, session: &'a Session) -> Self {
        let size = config.screen();
        Self {
            screen,
            robot,
            config,
            session,
            log: HeaderLog::new(config.pc(), size.x, size.y),
            pulse: Pulse::new(config),
        }
    }

    pub fn log(&self) -> &HeaderLog {
        &self.log
    }

    pub fn into_log(self) -> HeaderLog {
        self.log
    }

    /// Run both phases. Escape at any prompt or after any dot ends the run
    /// with `CalibrationError::Aborted`.
    pub async fn run<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Result<(), CalibrationError> {
        let grid = calibration_grid(self.config.n_points(), self.config.screen())?;
        self.robot
            .send_command(&Command::Head {
                pitch: START_PITCH,
                yaw: 0.0,
            })
            .await?;

        for text in TRAINING_TEXT {
            self.prompt(text).await?;
        }
        self.fixation().await?;
        let schedule = build_schedule(&grid, self.config.training_repeats(), rng);
        log::info!("training: {} dots", schedule.len());
        self.run_phase(Phase::Training, &schedule).await?;
        self.prompt(TRAINING_DONE_TEXT).await?;

        self.prompt(EXPERIMENT_TEXT).await?;
        self.fixation().await?;
        let schedule = build_schedule(&grid, self.config.experiment_repeats(), rng);
        log::info!("experiment: {} dots", schedule.len());
        self.run_phase(Phase::Experiment, &schedule).await?;
        self.prompt(EXPERIMENT_DONE_TEXT).await?;

        log::info!("session finished with {} frames", self.log.len());
        Ok(())
    }

    /// Present every dot of `schedule` in order.
    pub async fn run_phase(&mut self, phase: Phase, schedule: &[ScheduledDot]) -> Result<(), CalibrationError> {
        let block = 2 * self.config.n_points();
        let mut frame_count = 0u64;

        for (index, dot) in schedule.iter().enumerate() {
            let first_record = self.log.len();
            self.present_dot(phase, index, dot, &mut frame_count).await?;

            if self.screen.poll_key(&[Key::Escape]).is_some() {
                log::warn!("escape pressed after dot {}", index);
                return Err(CalibrationError::Aborted);
            }

            self.collect_response(dot, first_record).await?;

            let done = index + 1;
            if block > 0 && done % block == 0 && done < schedule.len() {
                self.take_break(phase, done / block + 1).await?;
            }
        }
        Ok(())
    }

    // Pulse the dot and capture frames_per_dot frames once the gaze settled.
    async fn present_dot(
        &mut self,
        phase: Phase,
        index: usize,
        dot: &ScheduledDot,
        frame_count: &mut u64,
    ) -> Result<(), CalibrationError> {
        let started = Instant::now();
        self.pulse.reset(self.config.dot_radius());

        let mut captured = 0;
        while captured < self.config.frames_per_dot() {
            let radius = self.pulse.advance();
            self.screen.draw_dot(dot.position, radius, DOT_COLOR);
            let samp_time = self.screen.flip()?;
            if started.elapsed() < self.config.settle() {
                continue;
            }

            let frame = self.robot.frame().await?;
            *frame_count += 1;
            captured += 1;
            if phase == Phase::Experiment {
                self.store_frame(&frame, *frame_count, index, dot, samp_time)?;
            }
        }
        Ok(())
    }

    fn store_frame(
        &mut self,
        frame: &Tensor<u8>,
        number: u64,
        index: usize,
        dot: &ScheduledDot,
        samp_time: f64,
    ) -> Result<(), CalibrationError> {
        let f_name = self.session.frame_file_name(number);
        image::save_bgr_jpeg(
            self.session.dir().join(&f_name),
            Vec2::new(frame.width(), frame.height()),
            &frame.data,
            self.config.jpeg_quality(),
        )?;
        log::debug!("stored {}", f_name);

        self.log.push(FrameRecord {
            frame_nr: number - 1,
            x: dot.position.x,
            y: dot.position.y,
            dot_nr: index,
            arrow_ori: dot.direction.as_str().to_string(),
            resp: String::new(),
            corr_resp: false,
            f_name,
            samp_time,
        });
        Ok(())
    }

    // Flash the arrow, wait for left/right and show whether it was right.
    async fn collect_response(&mut self, dot: &ScheduledDot, first_record: usize) -> Result<(), CalibrationError> {
        self.screen.draw_arrow(dot.position, dot.direction, ARROW_COLOR);
        self.screen.flip()?;
        pause(self.config.arrow_duration()).await;
        self.screen.flip()?;

        let key = self
            .screen
            .wait_key(&[Key::Left, Key::Right], Some(self.config.response_timeout()))?;
        let resp = key.map_or(NO_KEY, |key| key.as_str());
        let correct = resp == dot.direction.as_str();
        self.log.set_response(first_record, resp, correct);

        let color = if correct { CORRECT_COLOR } else { WRONG_COLOR };
        self.screen.draw_arrow(dot.position, dot.direction, color);
        self.screen.flip()?;
        pause(self.config.feedback_duration()).await;
        self.screen.flip()?;
        Ok(())
    }

    async fn take_break(&mut self, phase: Phase, position: usize) -> Result<(), CalibrationError> {
        log::info!("break, next position {}", position);
        self.prompt(&format!("break! Go to position: {}. Press space to continue", position))
            .await?;

        if phase == Phase::Experiment {
            if let Some(&(_, pitch)) = POSITION_PITCH.iter().find(|(at, _)| *at == position) {
                self.robot.send_command(&Command::Head { pitch, yaw: 0.0 }).await?;
            }
        }
        self.screen.flip()?;
        pause(self.config.break_pause()).await;
        Ok(())
    }

    // Show `text` until space is pressed.
    async fn prompt(&mut self, text: &str) -> Result<(), CalibrationError> {
        self.screen.show_text(text)?;
        match self.screen.wait_key(&[Key::Space], None)? {
            Some(Key::Escape) => Err(CalibrationError::Aborted),
            _ => Ok(()),
        }
    }

    // Central dot shown before a phase starts.
    async fn fixation(&mut self) -> Result<(), CalibrationError> {
        self.screen
            .draw_dot(Vec2::new(0.0, 0.0), self.config.dot_radius(), DOT_COLOR);
        self.screen.flip()?;
        pause(self.config.sample_duration()).await;
        Ok(())
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
