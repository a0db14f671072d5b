use {
    base::{Vec2, log},
    minifb::{Key, Window, WindowOptions},
    pepper::{Connection, ConnectionConfig, PepperError},
    std::{
        path::PathBuf,
        time::{Duration, Instant},
    },
};

const JPEG_QUALITY: u8 = 95;
const RECONNECT_DELAY_MS: u64 = 1000;

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

// usage: pepper-view [ip] [port] [camera] [frame directory]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ConnectionConfig::from_args(args.iter().take(3))?;
    let frame_dir = args.get(3).map(PathBuf::from);
    if let Some(dir) = &frame_dir {
        std::fs::create_dir_all(dir)?;
        log::info!("storing frames in {}", dir.display());
    }

    let profile = config.profile();
    let size: Vec2<usize> = profile.size();
    log::info!("Pepper stream viewer");
    log::info!("connecting to {} (camera profile {})", config.address(), profile.id());
    let mut connection = match connect_with_retry(&config).await {
        Ok(connection) => connection,
        Err(error) => base::log_fatal!("cannot reach the robot: {}", error),
    };

    let mut window = Window::new("pepper stream - ESC to exit", size.x, size.y, WindowOptions::default())?;

    let mut count: u64 = 0;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let start = Instant::now();
        let frame = connection.frame().await?;

        let fps = 1.0 / start.elapsed().as_secs_f64().max(f64::EPSILON);
        window.set_title(&format!("pepper stream - FPS: {:.1}", fps));
        window.update_with_buffer(&image::bgr_to_u32(size, &frame.data), size.x, size.y)?;

        if let Some(dir) = &frame_dir {
            let path = dir.join(format!("frame{}.jpg", count));
            image::save_bgr_jpeg(&path, size, &frame.data, JPEG_QUALITY)?;
        }
        count += 1;
        if count % 100 == 0 {
            log::info!("{} frames, {:.1} fps", count, fps);
        }
    }

    connection.close().await;
    log::info!("exiting after {} frames", count);
    Ok(())
}
