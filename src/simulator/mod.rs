//! Reward balance simulator.
//!
//! Runs seeded simulated players through the real [`GameService`] for a
//! number of days to see how fast levels, streaks, achievements and quest
//! rewards accumulate:
//! - Level and XP pacing per day of play
//! - How often streaks survive skipped days
//! - Achievement and quest reward rates
//!
//! [`GameService`]: crate::engine::GameService

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_player};
