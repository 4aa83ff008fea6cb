//! Persistence boundary for player stats and quests.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::quests::Quest;
use crate::stats::PlayerStats;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
}

/// Durable, per-user consistent storage.
pub trait Store: Send + Sync {
    /// `Ok(None)` for a user that has never been saved.
    fn load_stats(&self, user_id: &str) -> Result<Option<PlayerStats>, StoreError>;

    /// Saves the whole aggregate, replacing what was stored.
    fn save_stats(&self, stats: &PlayerStats) -> Result<(), StoreError>;

    fn load_quests(&self, user_id: &str) -> Result<Vec<Quest>, StoreError>;

    /// Inserts or replaces a quest by id.
    fn save_quest(&self, quest: &Quest) -> Result<(), StoreError>;

    /// Deleting a quest that does not exist is not an error.
    fn delete_quest(&self, user_id: &str, quest_id: Uuid) -> Result<(), StoreError>;
}

/// User ids double as directory names: letters, digits, `-` and `_` only.
pub fn validate_user_id(user_id: &str) -> Result<(), StoreError> {
    let valid = !user_id.is_empty()
        && user_id.len() <= 64
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidUserId(user_id.to_string()))
    }
}
