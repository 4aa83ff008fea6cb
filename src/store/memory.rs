//! In-process store used by tests and the simulator.

use super::{Store, StoreError};
use crate::quests::Quest;
use crate::stats::PlayerStats;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStore {
    stats: Mutex<HashMap<String, PlayerStats>>,
    quests: Mutex<HashMap<String, Vec<Quest>>>,
}

// A panic while holding one of these maps cannot leave a half-written entry,
// so a poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        lock(&self.stats).len()
    }
}

impl Store for MemoryStore {
    fn load_stats(&self, user_id: &str) -> Result<Option<PlayerStats>, StoreError> {
        Ok(lock(&self.stats).get(user_id).cloned())
    }

    fn save_stats(&self, stats: &PlayerStats) -> Result<(), StoreError> {
        lock(&self.stats).insert(stats.user_id.clone(), stats.clone());
        Ok(())
    }

    fn load_quests(&self, user_id: &str) -> Result<Vec<Quest>, StoreError> {
        Ok(lock(&self.quests).get(user_id).cloned().unwrap_or_default())
    }

    fn save_quest(&self, quest: &Quest) -> Result<(), StoreError> {
        let mut quests = lock(&self.quests);
        let list = quests.entry(quest.user_id.clone()).or_default();
        match list.iter_mut().find(|q| q.id == quest.id) {
            Some(existing) => *existing = quest.clone(),
            None => list.push(quest.clone()),
        }
        Ok(())
    }

    fn delete_quest(&self, user_id: &str, quest_id: Uuid) -> Result<(), StoreError> {
        if let Some(list) = lock(&self.quests).get_mut(user_id) {
            list.retain(|q| q.id != quest_id);
        }
        Ok(())
    }
}
