use {crate::*, base::Vec2};

/// Intersections of a `dims.x` by `dims.y` grid centered on `center`.
///
/// Points are listed column by column: x in the outer loop, y in the inner
/// loop. A 4x4 grid with spacing 10 around the origin runs from -15 to 15 on
/// both axes.
pub fn make_square_grid(center: Vec2<f32>, dims: Vec2<usize>, spacing: Vec2<f32>) -> Vec<Vec2<f32>> {
    let start = Vec2::new(
        center.x - 0.5 * dims.x as f32 * spacing.x + 0.5 * spacing.x,
        center.y - 0.5 * dims.y as f32 * spacing.y + 0.5 * spacing.y,
    );

    let mut points = Vec::with_capacity(dims.area());
    for col in 0..dims.x {
        let x = start.x + col as f32 * spacing.x;
        for row in 0..dims.y {
            points.push(Vec2::new(x, start.y + row as f32 * spacing.y));
        }
    }
    points
}

/// Calibration grid for 9, 12 or 15 points in screen coordinates (origin at
/// the center, y up), leaving a margin around the edges.
pub fn calibration_grid(n_points: usize, screen: Vec2<usize>) -> Result<Vec<Vec2<f32>>, CalibrationError> {
    let screen = screen.to_f32();
    let (dims, spacing) = match n_points {
        9 => (
            Vec2::new(3, 3),
            Vec2::new((screen.x - screen.x / 13.0) / 2.0, (screen.y - screen.y / 13.0) / 2.0),
        ),
        12 => (
            Vec2::new(4, 3),
            Vec2::new((screen.x - screen.x / 10.0) / 3.0, (screen.y - screen.y / 10.0) / 2.0),
        ),
        15 => (
            Vec2::new(5, 3),
            Vec2::new((screen.x - screen.x / 25.0) / 4.0, (screen.y - screen.y / 15.0) / 2.0),
        ),
        other => return Err(CalibrationError::UnsupportedPointCount(other)),
    };
    Ok(make_square_grid(Vec2::new(0.0, 0.0), dims, spacing))
}
