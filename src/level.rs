use std::time::Duration;

pub const SPEED_MIN: u32 = 1;
pub const SPEED_MAX: u32 = 100;
pub const DEFAULT_SPEED: u32 = 20;

const LEVEL_SPEED_STEP: u32 = 5;
const BASE_TARGET: u32 = 6;
const TARGET_GROWTH: u32 = 2;

// Terminal characters are taller than they are wide, so vertical moves are
// slowed down to look as fast as horizontal ones.
const VERTICAL_STRETCH: f64 = 1.35;

/// Progression rules for one level: how fast the worm moves and how much food
/// clears the level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub number: u32,
    pub speed: u32,
    pub target: u32,
}

impl Level {
    pub fn first(base_speed: u32) -> Self {
        Level::nth(1, base_speed)
    }

    pub fn nth(number: u32, base_speed: u32) -> Self {
        let number = number.max(1);
        let speed = base_speed
            .saturating_add((number - 1).saturating_mul(LEVEL_SPEED_STEP))
            .clamp(SPEED_MIN, SPEED_MAX);
        let target = BASE_TARGET + (number - 1) * TARGET_GROWTH;
        Level { number, speed, target }
    }

    pub fn next(&self, base_speed: u32) -> Self {
        Level::nth(self.number + 1, base_speed)
    }

    pub fn tick_interval(&self, vertical: bool) -> Duration {
        let millis = 1000.0 / self.speed as f64;
        let millis = if vertical { (millis * VERTICAL_STRETCH).ceil() } else { millis };
        Duration::from_micros((millis * 1000.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_and_speeds_grow() {
        assert_eq!(Level::first(20), Level { number: 1, speed: 20, target: 6 });
        assert_eq!(Level::first(20).next(20), Level { number: 2, speed: 25, target: 8 });
        assert_eq!(Level::nth(4, 20), Level { number: 4, speed: 35, target: 12 });
    }

    #[test]
    fn speed_is_capped() {
        assert_eq!(Level::nth(3, 95).speed, SPEED_MAX);
        assert_eq!(Level::nth(1_000, 100).speed, SPEED_MAX);
    }

    #[test]
    fn tick_interval_follows_speed() {
        let level = Level::first(20);
        assert_eq!(level.tick_interval(false), Duration::from_millis(50));
        assert_eq!(level.tick_interval(true), Duration::from_millis(68));
        assert_eq!(Level::first(100).tick_interval(false), Duration::from_millis(10));
    }
}
