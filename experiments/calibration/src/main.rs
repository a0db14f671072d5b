use {
    base::log,
    calibration::{Calibration, CalibrationConfig, CalibrationError, Session, display::MinifbScreen},
    pepper::{Connection, ConnectionConfig, PepperError},
    std::time::Duration,
};

const BACKGROUND: [u8; 3] = [0, 0, 0];
const RECONNECT_DELAY_MS: u64 = 1000;
const LOG_DIR_VAR: &str = "PEPPER_LOG_DIR";

async fn connect_with_retry(config: &ConnectionConfig) -> Result<Connection, PepperError> {
    match Connection::connect(config).await {
        Ok(connection) => Ok(connection),
        Err(error) => {
            log::warn!("{}, retrying once", error);
            tokio::time::sleep(Duration::from_millis(RECONNECT_DELAY_MS)).await;
            Connection::connect(config).await
        }
    }
}

// usage: calibration [ip] [port] [camera] [output directory]
// PEPPER_PC, PEPPER_SCREEN and PEPPER_POINTS override the session defaults,
// PEPPER_LOG_DIR sends the log to daily files instead of stdout.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match std::env::var_os(LOG_DIR_VAR) {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let connection_config = ConnectionConfig::from_args(args.iter().take(3))?;
    let mut config = CalibrationConfig::from_env();
    if let Some(root) = args.get(3) {
        config = config.with_output_root(root);
    }

    log::info!("Pepper gaze calibration");
    log::info!(
        "{} points, screen {}x{}, pc {}",
        config.n_points(),
        config.screen().x,
        config.screen().y,
        config.pc()
    );

    let mut rng = rand::thread_rng();
    let now = chrono::Local::now().naive_local();
    let session = Session::create(config.output_root(), &now, &mut rng)?;

    let mut robot = connect_with_retry(&connection_config).await?;
    let mut screen = MinifbScreen::open(&config, BACKGROUND)?;

    let mut driver = Calibration::new(&mut screen, &mut robot, &config, &session);
    let result = driver.run(&mut rng).await;
    let header = driver.into_log();

    // partial sessions are kept
    header.save(&session)?;
    robot.close().await;

    match result {
        Ok(()) => Ok(()),
        Err(CalibrationError::Aborted) => {
            log::warn!("session {} aborted after {} frames", session.name(), header.len());
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
