use {
    base::{Tensor, Vec2},
    calibration::{
        Calibration, CalibrationConfig, CalibrationError, Direction, Key, NO_KEY, Pulse, Screen, Session,
        calibration_grid,
    },
    chrono::NaiveDate,
    pepper::{Command, CommandSink, FrameSource, PepperError},
    rand::{SeedableRng, rngs::StdRng},
    std::{collections::VecDeque, path::PathBuf, time::Duration},
};

/// Records what was drawn and answers key requests from a script.
#[derive(Default)]
struct FakeScreen {
    size: Vec2<usize>,
    time: f64,
    flips: usize,
    texts: Vec<String>,
    arrows: Vec<(Direction, [u8; 3])>,
    responses: VecDeque<Option<Key>>,
    escape_on_poll: Option<usize>,
    escape_on_prompt: bool,
    polls: usize,
}

impl FakeScreen {
    fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Screen for FakeScreen {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn draw_dot(&mut self, _center: Vec2<f32>, _radius: f32, _color: [u8; 3]) {}

    fn draw_arrow(&mut self, _center: Vec2<f32>, direction: Direction, color: [u8; 3]) {
        self.arrows.push((direction, color));
    }

    fn flip(&mut self) -> Result<f64, CalibrationError> {
        self.flips += 1;
        self.time += 1.0 / 60.0;
        Ok(self.time)
    }

    fn show_text(&mut self, text: &str) -> Result<(), CalibrationError> {
        self.texts.push(text.to_string());
        self.flip()?;
        Ok(())
    }

    fn poll_key(&mut self, allowed: &[Key]) -> Option<Key> {
        self.polls += 1;
        if self.escape_on_poll == Some(self.polls) && allowed.contains(&Key::Escape) {
            return Some(Key::Escape);
        }
        None
    }

    fn wait_key(&mut self, allowed: &[Key], _timeout: Option<Duration>) -> Result<Option<Key>, CalibrationError> {
        if allowed.contains(&Key::Space) {
            return Ok(Some(if self.escape_on_prompt { Key::Escape } else { Key::Space }));
        }
        Ok(self.responses.pop_front().flatten())
    }
}

/// Hands out tiny constant frames and remembers every command.
struct FakeRobot {
    frames: u64,
    commands: Vec<Command>,
}

impl FakeRobot {
    fn new() -> Self {
        Self {
            frames: 0,
            commands: Vec::new(),
        }
    }
}

impl FrameSource for FakeRobot {
    async fn frame(&mut self) -> Result<Tensor<u8>, PepperError> {
        self.frames += 1;
        Ok(Tensor::new(vec![2, 4, 3], vec![(self.frames % 256) as u8; 24])?)
    }

    fn frame_size(&self) -> Vec2<usize> {
        Vec2::new(4, 2)
    }
}

impl CommandSink for FakeRobot {
    async fn send_command(&mut self, command: &Command) -> Result<(), PepperError> {
        self.commands.push(command.clone());
        Ok(())
    }
}

fn temp_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pepper-trial-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn session(root: &PathBuf) -> Session {
    let now = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    Session::create(root, &now, &mut StdRng::seed_from_u64(1)).unwrap()
}

fn config(root: &PathBuf) -> CalibrationConfig {
    CalibrationConfig::default()
        .with_n_points(9)
        .with_frames_per_dot(2)
        .with_training_repeats(1)
        .with_experiment_repeats(8)
        .with_screen(Vec2::new(900, 600))
        .with_pc("test-rig")
        .with_output_root(root)
        .without_delays()
}

#[tokio::test]
async fn test_full_session_headless() {
    let root = temp_root("full");
    let session = session(&root);
    let config = config(&root);
    let mut screen = FakeScreen::new(config.screen());
    screen.responses = std::iter::repeat(Some(Key::Left)).take(100).collect();
    let mut robot = FakeRobot::new();

    let mut driver = Calibration::new(&mut screen, &mut robot, &config, &session);
    driver.run(&mut StdRng::seed_from_u64(4)).await.unwrap();
    let log = driver.into_log();

    // 9 training dots and 72 experiment dots, two frames each
    assert_eq!(robot.frames, (9 + 72) * 2);
    assert_eq!(log.len(), 72 * 2);
    assert_eq!(log.pc, "test-rig");
    assert_eq!((log.res_x, log.res_y), (900, 600));

    let mut last_time = 0.0;
    for (i, record) in log.frames.iter().enumerate() {
        assert_eq!(record.frame_nr, i as u64);
        assert_eq!(record.dot_nr, i / 2);
        assert_eq!(record.f_name, session.frame_file_name(i as u64 + 1));
        assert!(session.dir().join(&record.f_name).is_file());
        assert!(record.samp_time > last_time);
        last_time = record.samp_time;

        assert_eq!(record.resp, "left");
        assert_eq!(record.corr_resp, record.arrow_ori == "left");
    }

    // both frames of a dot share its position and arrow
    for pair in log.frames.chunks(2) {
        assert_eq!((pair[0].x, pair[0].y), (pair[1].x, pair[1].y));
        assert_eq!(pair[0].arrow_ori, pair[1].arrow_ori);
    }

    // every nine experiment dots cover the grid
    let grid = calibration_grid(9, config.screen()).unwrap();
    for block in log.frames.chunks(18) {
        for point in &grid {
            assert!(block.iter().any(|r| r.x == point.x && r.y == point.y));
        }
    }

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_breaks_and_head_moves() {
    let root = temp_root("breaks");
    let session = session(&root);
    let config = config(&root);
    let mut screen = FakeScreen::new(config.screen());
    let mut robot = FakeRobot::new();

    Calibration::new(&mut screen, &mut robot, &config, &session)
        .run(&mut StdRng::seed_from_u64(8))
        .await
        .unwrap();

    // a break every 18 dots, none after the last one
    let breaks: Vec<&String> = screen.texts.iter().filter(|t| t.starts_with("break!")).collect();
    assert_eq!(breaks.len(), 3);
    assert!(breaks[0].contains("position: 2"));
    assert!(breaks[2].contains("position: 4"));

    assert_eq!(
        robot.commands,
        vec![
            Command::Head { pitch: -0.3, yaw: 0.0 },
            Command::Head { pitch: 0.2, yaw: 0.0 },
        ]
    );

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_missing_response_is_no_key() {
    let root = temp_root("nokey");
    let session = session(&root);
    let config = config(&root).with_experiment_repeats(1);
    let mut screen = FakeScreen::new(config.screen());
    let mut robot = FakeRobot::new();

    let mut driver = Calibration::new(&mut screen, &mut robot, &config, &session);
    driver.run(&mut StdRng::seed_from_u64(5)).await.unwrap();
    let log = driver.into_log();

    assert_eq!(log.len(), 18);
    assert!(log.frames.iter().all(|r| r.resp == NO_KEY && !r.corr_resp));

    // every arrow is shown white, then red for the missed answer
    assert_eq!(screen.arrows.len(), 2 * (9 + 9));
    for pair in screen.arrows.chunks(2) {
        assert_eq!(pair[0].1, [255, 255, 255]);
        assert_eq!(pair[1].1, [255, 0, 0]);
        assert_eq!(pair[0].0, pair[1].0);
    }

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_escape_during_experiment_keeps_partial_log() {
    let root = temp_root("escape");
    let session = session(&root);
    let config = config(&root);
    let mut screen = FakeScreen::new(config.screen());
    // 9 training dots, then the second experiment dot
    screen.escape_on_poll = Some(11);
    let mut robot = FakeRobot::new();

    let mut driver = Calibration::new(&mut screen, &mut robot, &config, &session);
    let result = driver.run(&mut StdRng::seed_from_u64(6)).await;
    assert!(matches!(result, Err(CalibrationError::Aborted)));

    let log = driver.into_log();
    assert_eq!(log.len(), 4);
    assert_eq!(log.frames[0].resp, NO_KEY);
    assert_eq!(log.frames[3].resp, "");

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_escape_at_first_prompt() {
    let root = temp_root("prompt");
    let session = session(&root);
    let config = config(&root);
    let mut screen = FakeScreen::new(config.screen());
    screen.escape_on_prompt = true;
    let mut robot = FakeRobot::new();

    let result = Calibration::new(&mut screen, &mut robot, &config, &session)
        .run(&mut StdRng::seed_from_u64(7))
        .await;

    assert!(matches!(result, Err(CalibrationError::Aborted)));
    assert_eq!(robot.frames, 0);
    assert_eq!(screen.texts.len(), 1);
    assert_eq!(robot.commands, vec![Command::Head { pitch: -0.3, yaw: 0.0 }]);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn test_unsupported_points_fail_before_commands() {
    let root = temp_root("points");
    let session = session(&root);
    let config = config(&root).with_n_points(10);
    let mut screen = FakeScreen::new(config.screen());
    let mut robot = FakeRobot::new();

    let result = Calibration::new(&mut screen, &mut robot, &config, &session)
        .run(&mut StdRng::seed_from_u64(7))
        .await;

    assert!(matches!(result, Err(CalibrationError::UnsupportedPointCount(10))));
    assert!(robot.commands.is_empty());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_pulse_stays_within_bounds() {
    // width 1500: start 20, bounds 5..25, step 0.75
    let config = CalibrationConfig::default().with_screen(Vec2::new(1500, 900));
    let mut pulse = Pulse::new(&config);

    assert_eq!(pulse.advance(), 19.25);
    let radii: Vec<f32> = (0..200).map(|_| pulse.advance()).collect();
    assert!(radii.iter().all(|&r| r >= 5.0 - 0.75 && r <= 25.0 + 0.75));
    assert!(radii.windows(2).any(|w| w[1] > w[0]));
    assert!(radii.windows(2).any(|w| w[1] < w[0]));
}

#[test]
fn test_pulse_direction_survives_reset() {
    let config = CalibrationConfig::default().with_screen(Vec2::new(1500, 900));
    let mut pulse = Pulse::new(&config);
    // run down past the lower bound so the pulse turns around
    while pulse.advance() >= 5.0 {}
    pulse.advance();

    pulse.reset(20.0);
    assert_eq!(pulse.advance(), 20.75);
}
