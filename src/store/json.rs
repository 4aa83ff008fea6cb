//! File-backed store: one directory per user under a root.
//!
//! ```text
//! <root>/<user_id>/stats.json
//! <root>/<user_id>/quests.json
//! ```

use super::{validate_user_id, Store, StoreError};
use crate::quests::Quest;
use crate::stats::PlayerStats;
use crate::utils::persistence::{data_dir, read_json, write_json};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STATS_FILE: &str = "stats.json";
const QUESTS_FILE: &str = "quests.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `~/.questify/players`.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self::new(data_dir()?.join("players")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        validate_user_id(user_id)?;
        Ok(self.root.join(user_id))
    }

    fn write_quests(&self, user_id: &str, quests: &[Quest]) -> Result<(), StoreError> {
        let path = self.user_dir(user_id)?.join(QUESTS_FILE);
        write_json(&path, &quests)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_stats(&self, user_id: &str) -> Result<Option<PlayerStats>, StoreError> {
        let path = self.user_dir(user_id)?.join(STATS_FILE);
        Ok(read_json(&path)?)
    }

    fn save_stats(&self, stats: &PlayerStats) -> Result<(), StoreError> {
        let path = self.user_dir(&stats.user_id)?.join(STATS_FILE);
        write_json(&path, stats)?;
        Ok(())
    }

    fn load_quests(&self, user_id: &str) -> Result<Vec<Quest>, StoreError> {
        let path = self.user_dir(user_id)?.join(QUESTS_FILE);
        Ok(read_json::<Vec<Quest>>(&path)?.unwrap_or_default())
    }

    fn save_quest(&self, quest: &Quest) -> Result<(), StoreError> {
        let mut quests = self.load_quests(&quest.user_id)?;
        match quests.iter_mut().find(|q| q.id == quest.id) {
            Some(existing) => *existing = quest.clone(),
            None => quests.push(quest.clone()),
        }
        self.write_quests(&quest.user_id, &quests)
    }

    fn delete_quest(&self, user_id: &str, quest_id: Uuid) -> Result<(), StoreError> {
        let mut quests = self.load_quests(user_id)?;
        let before = quests.len();
        quests.retain(|q| q.id != quest_id);
        if quests.len() != before {
            self.write_quests(user_id, &quests)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch() -> JsonStore {
        JsonStore::new(std::env::temp_dir().join(format!("questify-store-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_missing_user_loads_empty() {
        let store = scratch();
        assert!(store.load_stats("nobody").unwrap().is_none());
        assert!(store.load_quests("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_stats_written_per_user() {
        let store = scratch();
        let mut stats = PlayerStats::new("alice");
        stats.gain_xp(120);
        store.save_stats(&stats).unwrap();

        assert!(store.root().join("alice").join(STATS_FILE).exists());
        assert_eq!(store.load_stats("alice").unwrap(), Some(stats));
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_rejects_path_like_user_ids() {
        let store = scratch();
        let err = store.load_stats("../evil").unwrap_err();
        assert!(matches!(err, StoreError::InvalidUserId(_)));
        let stats = PlayerStats::new("a/b");
        assert!(store.save_stats(&stats).is_err());
    }

    #[test]
    fn test_corrupt_stats_file_is_an_error() {
        let store = scratch();
        let dir = store.root().join("bob");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STATS_FILE), "not json").unwrap();
        assert!(matches!(
            store.load_stats("bob").unwrap_err(),
            StoreError::Io(_)
        ));
        fs::remove_dir_all(store.root()).ok();
    }
}
