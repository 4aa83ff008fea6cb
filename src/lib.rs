//! Questify - reward engine for a gamified task manager.
//!
//! Turns task lifecycle events into XP, levels, coins, gems, streaks,
//! achievements and quest progress. Storage sits behind the
//! [`store::Store`] trait; [`engine::GameService`] serialises work per user.

pub mod achievements;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod quests;
pub mod simulator;
pub mod stats;
pub mod store;
pub mod tasks;
pub mod utils;

pub use config::{CatalogConfig, CatalogError};
pub use engine::{
    ClaimOutcome, EventOutcome, GameEvent, GameService, LoadedPlayer, Notification, PlayerState,
    RewardEngine, TaskCompletion,
};
pub use error::{Currency, EngineError};
pub use stats::{LevelUp, PlayerStats};
pub use store::{JsonStore, MemoryStore, Store, StoreError};
pub use tasks::{Difficulty, Priority, Task};
