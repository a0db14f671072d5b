use {
    base::Vec2,
    rand::{Rng, seq::SliceRandom},
    std::fmt,
};

/// Orientation of the response arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dot of a phase: where it appears and which way its arrow points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledDot {
    pub position: Vec2<f32>,
    pub direction: Direction,
}

/// Repeat `grid` `repeats` times, shuffle each repetition on its own and draw
/// an arrow direction for every dot.
///
/// Every block of `grid.len()` consecutive dots therefore visits each grid
/// point exactly once.
pub fn build_schedule<R: Rng + ?Sized>(grid: &[Vec2<f32>], repeats: usize, rng: &mut R) -> Vec<ScheduledDot> {
    let mut schedule = Vec::with_capacity(grid.len() * repeats);
    for _ in 0..repeats {
        let mut block = grid.to_vec();
        block.shuffle(rng);
        schedule.extend(block.into_iter().map(|position| ScheduledDot {
            position,
            direction: if rng.gen_bool(0.5) {
                Direction::Right
            } else {
                Direction::Left
            },
        }));
    }
    schedule
}
