//! Tuning constants, the level curve and the clock.

pub mod clock;
pub mod constants;
pub mod leveling;

pub use clock::{Clock, FixedClock, SystemClock};
pub use leveling::{level_from_total_xp, level_title, LevelInfo};
