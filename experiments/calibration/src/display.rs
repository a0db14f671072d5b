use {
    crate::*,
    base::Vec2,
    minifb::{KeyRepeat, Window, WindowOptions},
    std::time::{Duration, Instant},
};

const TARGET_FPS: usize = 60;
const KEY_POLL_MS: u64 = 10;
const WINDOW_TITLE: &str = "Pepper calibration";

/// Software frame buffer in minifb's `0xAARRGGBB` layout.
///
/// Shapes take centered coordinates (origin in the middle, y up) and are
/// clipped to the buffer.
pub struct Canvas {
    size: Vec2<usize>,
    background: [u8; 3],
    inner_radius: f32,
    arrow_width: f32,
    pixels: Vec<u32>,
}

impl Canvas {
    /// Blank canvas of the configured screen size, with the dot and arrow
    /// geometry taken from `config`.
    pub fn new(config: &CalibrationConfig, background: [u8; 3]) -> Self {
        let size = config.screen();
        Self {
            size,
            background,
            inner_radius: config.inner_dot_radius(),
            arrow_width: config.arrow_width(),
            pixels: vec![image::rgb_to_argb_pixel(background); size.area()],
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Buffer value at column `x`, row `y` counted from the top left.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.size.x + x]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(image::rgb_to_argb_pixel(self.background));
    }

    fn to_buffer(&self, p: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(self.size.x as f32 / 2.0 + p.x, self.size.y as f32 / 2.0 - p.y)
    }

    // Visit every pixel whose center lies in the box and passes `inside`.
    fn fill_where(&mut self, min: Vec2<f32>, max: Vec2<f32>, color: u32, inside: impl Fn(f32, f32) -> bool) {
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.size.x);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.size.y);
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(x as f32 + 0.5, y as f32 + 0.5) {
                    self.pixels[y * self.size.x + x] = color;
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2<f32>, radius: f32, color: [u8; 3]) {
        let c = self.to_buffer(center);
        let r2 = radius * radius;
        self.fill_where(
            Vec2::new(c.x - radius, c.y - radius),
            Vec2::new(c.x + radius, c.y + radius),
            image::rgb_to_argb_pixel(color),
            |x, y| (x - c.x) * (x - c.x) + (y - c.y) * (y - c.y) <= r2,
        );
    }

    pub fn fill_rect(&mut self, center: Vec2<f32>, size: Vec2<f32>, color: [u8; 3]) {
        let c = self.to_buffer(center);
        let half = size / 2.0;
        self.fill_where(c - half, c + half, image::rgb_to_argb_pixel(color), |_, _| true);
    }

    pub fn fill_triangle(&mut self, points: [Vec2<f32>; 3], color: [u8; 3]) {
        let [a, b, c] = points.map(|p| self.to_buffer(p));
        let edge = |p: Vec2<f32>, q: Vec2<f32>, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);
        let min = Vec2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
        let max = Vec2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));
        self.fill_where(min, max, image::rgb_to_argb_pixel(color), |x, y| {
            let e0 = edge(a, b, x, y);
            let e1 = edge(b, c, x, y);
            let e2 = edge(c, a, x, y);
            (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0)
        });
    }

    /// Outer dot in `color` with a background-colored center.
    pub fn draw_dot(&mut self, center: Vec2<f32>, radius: f32, color: [u8; 3]) {
        self.fill_circle(center, radius, color);
        self.fill_circle(center, self.inner_radius, self.background);
    }

    /// Horizontal bar with a triangular head on the `direction` side.
    pub fn draw_arrow(&mut self, center: Vec2<f32>, direction: Direction, color: [u8; 3]) {
        let width = self.arrow_width;
        self.fill_rect(center, Vec2::new(width, width / 5.0), color);

        // head is an equilateral triangle with circumradius width/2
        let r = width / 2.0;
        let sign = match direction {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        };
        let head = Vec2::new(center.x + sign * r, center.y);
        let back = r * 0.5;
        let spread = r * 3f32.sqrt() / 2.0;
        self.fill_triangle(
            [
                Vec2::new(head.x + sign * r, head.y),
                Vec2::new(head.x - sign * back, head.y + spread),
                Vec2::new(head.x - sign * back, head.y - spread),
            ],
            color,
        );
    }
}

fn map_key(key: minifb::Key) -> Option<Key> {
    match key {
        minifb::Key::Space => Some(Key::Space),
        minifb::Key::Escape => Some(Key::Escape),
        minifb::Key::Left => Some(Key::Left),
        minifb::Key::Right => Some(Key::Right),
        _ => None,
    }
}

/// A borderless minifb window driven as the session's screen.
pub struct MinifbScreen {
    window: Window,
    canvas: Canvas,
    opened: Instant,
    pending: Vec<Key>,
}

impl MinifbScreen {
    pub fn open(config: &CalibrationConfig, background: [u8; 3]) -> Result<Self, CalibrationError> {
        let size = config.screen();
        let mut window = Window::new(
            WINDOW_TITLE,
            size.x,
            size.y,
            WindowOptions {
                borderless: true,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(TARGET_FPS);
        log::info!("calibration window {}x{}", size.x, size.y);
        Ok(Self {
            window,
            canvas: Canvas::new(config, background),
            opened: Instant::now(),
            pending: Vec::new(),
        })
    }

    // Closing the window counts as escape.
    fn collect_keys(&mut self) {
        if !self.window.is_open() {
            self.pending.push(Key::Escape);
            return;
        }
        let keys = self.window.get_keys_pressed(KeyRepeat::No);
        self.pending.extend(keys.into_iter().filter_map(map_key));
    }
}

impl Screen for MinifbScreen {
    fn size(&self) -> Vec2<usize> {
        self.canvas.size()
    }

    fn draw_dot(&mut self, center: Vec2<f32>, radius: f32, color: [u8; 3]) {
        self.canvas.draw_dot(center, radius, color);
    }

    fn draw_arrow(&mut self, center: Vec2<f32>, direction: Direction, color: [u8; 3]) {
        self.canvas.draw_arrow(center, direction, color);
    }

    fn flip(&mut self) -> Result<f64, CalibrationError> {
        let size = self.canvas.size();
        self.window.update_with_buffer(self.canvas.pixels(), size.x, size.y)?;
        self.canvas.clear();
        self.collect_keys();
        Ok(self.opened.elapsed().as_secs_f64())
    }

    fn show_text(&mut self, text: &str) -> Result<(), CalibrationError> {
        self.window.set_title(&format!("{} - {}", WINDOW_TITLE, text));
        log::info!("{}", text);
        self.flip()?;
        Ok(())
    }

    fn poll_key(&mut self, allowed: &[Key]) -> Option<Key> {
        self.window.update();
        self.collect_keys();
        let found = self.pending.iter().copied().find(|key| allowed.contains(key));
        self.pending.clear();
        found
    }

    fn wait_key(&mut self, allowed: &[Key], timeout: Option<Duration>) -> Result<Option<Key>, CalibrationError> {
        self.pending.clear();
        let start = Instant::now();
        loop {
            self.window.update();
            self.collect_keys();
            if let Some(key) = self
                .pending
                .drain(..)
                .find(|key| *key == Key::Escape || allowed.contains(key))
            {
                return Ok(Some(key));
            }
            if timeout.is_some_and(|timeout| start.elapsed() >= timeout) {
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(KEY_POLL_MS));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFF_FFFF;

    fn canvas(width: usize, height: usize, background: [u8; 3]) -> Canvas {
        let config = CalibrationConfig::default().with_screen(Vec2::new(width, height));
        Canvas::new(&config, background)
    }
    const BLACK: u32 = 0xFF00_0000;

    #[test]
    fn test_circle_is_centered() {
        let mut canvas = canvas(100, 80, [0, 0, 0]);
        canvas.fill_circle(Vec2::new(0.0, 0.0), 10.0, [255, 255, 255]);
        assert_eq!(canvas.pixel(50, 40), WHITE);
        assert_eq!(canvas.pixel(50, 31), WHITE);
        assert_eq!(canvas.pixel(50, 28), BLACK);
        assert_eq!(canvas.pixel(0, 0), BLACK);
    }

    #[test]
    fn test_y_points_up() {
        let mut canvas = canvas(100, 100, [0, 0, 0]);
        canvas.fill_circle(Vec2::new(0.0, 30.0), 3.0, [255, 0, 0]);
        assert_eq!(canvas.pixel(50, 20), 0xFFFF_0000);
        assert_eq!(canvas.pixel(50, 80), BLACK);
    }

    #[test]
    fn test_shapes_are_clipped() {
        let mut canvas = canvas(20, 20, [0, 0, 0]);
        canvas.fill_circle(Vec2::new(-10.0, 10.0), 8.0, [255, 255, 255]);
        canvas.fill_rect(Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0), [255, 255, 255]);
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(19, 19), BLACK);
    }

    #[test]
    fn test_dot_has_background_center() {
        let mut canvas = canvas(1000, 500, [0, 0, 0]);
        canvas.draw_dot(Vec2::new(0.0, 0.0), 13.0, [255, 255, 255]);
        assert_eq!(canvas.pixel(500, 250), BLACK);
        assert_eq!(canvas.pixel(510, 250), WHITE);
    }

    #[test]
    fn test_geometry_comes_from_config() {
        let config = CalibrationConfig::default().with_screen(Vec2::new(1500, 300));
        let mut canvas = Canvas::new(&config, [0, 0, 0]);
        // inner radius 3, arrow width 25
        canvas.draw_dot(Vec2::new(0.0, 0.0), 10.0, [255, 255, 255]);
        assert_eq!(canvas.pixel(752, 150), BLACK);
        assert_eq!(canvas.pixel(754, 150), WHITE);

        canvas.clear();
        canvas.draw_arrow(Vec2::new(0.0, 0.0), Direction::Right, [255, 255, 255]);
        assert_eq!(canvas.pixel(763, 150), WHITE);
        assert_eq!(canvas.pixel(736, 150), BLACK);
    }

    #[test]
    fn test_arrow_head_points_left_or_right() {
        let mut canvas = canvas(600, 200, [0, 0, 0]);
        canvas.draw_arrow(Vec2::new(0.0, 0.0), Direction::Right, [0, 255, 0]);
        // width 10: bar spans x 295..305, head tip reaches x 310
        assert_eq!(canvas.pixel(300, 100), 0xFF00_FF00);
        assert_eq!(canvas.pixel(308, 100), 0xFF00_FF00);
        assert_eq!(canvas.pixel(292, 100), BLACK);

        canvas.clear();
        canvas.draw_arrow(Vec2::new(0.0, 0.0), Direction::Left, [0, 255, 0]);
        assert_eq!(canvas.pixel(291, 100), 0xFF00_FF00);
        assert_eq!(canvas.pixel(308, 100), BLACK);
    }

    #[test]
    fn test_clear_restores_background() {
        let mut canvas = canvas(10, 10, [10, 20, 30]);
        canvas.fill_rect(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), [255, 255, 255]);
        canvas.clear();
        assert!(canvas.pixels().iter().all(|&p| p == 0xFF0A_141E));
    }
}
