//! Score and level tracking

use serde::Serialize;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;
/// Points per cleared line, multiplied by the level
pub const POINTS_PER_LINE: u64 = 100;

/// Session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starts at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Record a placement that cleared `cleared` lines and return the points gained.
    ///
    /// Points use the level from before this clear; a level-up caused by this
    /// clear only affects later clears.
    pub fn on_lines_cleared(&mut self, cleared: u32) -> u64 {
        if cleared == 0 {
            return 0;
        }
        let gained = u64::from(cleared) * POINTS_PER_LINE * u64::from(self.level);
        self.points += gained;
        self.lines += cleared;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        gained
    }
}
