//! Player stats: level, wallet, counters and streak.

pub mod logic;
pub mod streak;
pub mod types;

pub use logic::LevelUp;
pub use streak::{register_completion, StreakUpdate};
pub use types::{CategoryStat, PlayerStats};
