//! Store-backed front door: load, route, persist, one user at a time.

use super::events::{ClaimOutcome, EventOutcome, GameEvent, TaskCompletion};
use super::router::{PlayerState, RewardEngine};
use crate::achievements::UnlockedAchievement;
use crate::config::CatalogConfig;
use crate::core::clock::Clock;
use crate::error::EngineError;
use crate::quests::{GenerationReport, Quest};
use crate::stats::PlayerStats;
use crate::store::Store;
use crate::tasks::{Task, TaskStatus};
use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What loading a player did besides reading storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPlayer {
    pub state: PlayerState,
    pub is_new: bool,
    /// Stored stats violated an invariant and were repaired.
    pub repaired: bool,
    pub generation: GenerationReport,
    pub unlocked: Vec<UnlockedAchievement>,
}

/// Serialises every operation per user around load, mutate and save.
///
/// Two calls for the same user never interleave, so an achievement or a
/// quest claim cannot be granted twice. Different users use different locks.
pub struct GameService<S: Store, C: Clock> {
    store: S,
    clock: C,
    engine: RewardEngine,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    rng: Mutex<ChaCha8Rng>,
}

impl<S: Store, C: Clock> GameService<S, C> {
    pub fn new(store: S, clock: C, catalogs: CatalogConfig) -> Self {
        Self::with_rng(store, clock, catalogs, ChaCha8Rng::from_entropy())
    }

    /// Deterministic quest selection for tests and simulations.
    pub fn with_seed(store: S, clock: C, catalogs: CatalogConfig, seed: u64) -> Self {
        Self::with_rng(store, clock, catalogs, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(store: S, clock: C, catalogs: CatalogConfig, rng: ChaCha8Rng) -> Self {
        Self {
            store,
            clock,
            engine: RewardEngine::new(catalogs),
            locks: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| EngineError::LockPoisoned(user_id.to_string()))?;
        Ok(locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Drops the map entry when only the map and `lock` still hold it.
    ///
    /// New clones are only handed out under the map lock, so the count cannot
    /// grow while it is checked.
    fn release_lock(&self, user_id: &str, lock: &Arc<Mutex<()>>) {
        if let Ok(mut locks) = self.locks.lock() {
            if Arc::strong_count(lock) == 2 {
                locks.remove(user_id);
            }
        }
    }

    /// Runs `f` holding the user's lock.
    fn locked<T, F>(&self, user_id: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce() -> Result<T, EngineError>,
    {
        let lock = self.user_lock(user_id)?;
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(EngineError::LockPoisoned(user_id.to_string())),
        };
        self.release_lock(user_id, &lock);
        result
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }

    fn refresh(
        &self,
        state: &mut PlayerState,
        now: NaiveDateTime,
    ) -> Result<GenerationReport, EngineError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| EngineError::LockPoisoned(state.stats.user_id.clone()))?;
        Ok(self.engine.refresh_quests(state, now, &mut *rng))
    }

    /// Reads, repairs and refreshes a player. Caller must hold the user lock.
    fn load(
        &self,
        user_id: &str,
        now: NaiveDateTime,
    ) -> Result<(LoadedPlayer, Vec<Quest>), EngineError> {
        let (stats, is_new) = match self.store.load_stats(user_id)? {
            Some(stats) => (stats, false),
            None => (PlayerStats::new(user_id), true),
        };
        let stored_quests = self.store.load_quests(user_id)?;
        let mut state = PlayerState {
            stats,
            quests: stored_quests.clone(),
        };
        if state.stats.user_id != user_id {
            warn!(stored = %state.stats.user_id, user = user_id, "stats saved under another id");
            state.stats.user_id = user_id.to_string();
        }

        let repaired = state.stats.sanitize();
        state.stats.roll_over(now.date());
        let generation = self.refresh(&mut state, now)?;
        let unlocked = self.engine.rescan(&mut state);
        if is_new {
            info!(user = user_id, "new player");
        }

        Ok((
            LoadedPlayer {
                state,
                is_new,
                repaired,
                generation,
                unlocked,
            },
            stored_quests,
        ))
    }

    /// Quest records go first: if a later write fails, a claimed quest is
    /// already marked and its reward is lost rather than paid twice.
    fn persist(&self, state: &PlayerState, stored_quests: &[Quest]) -> Result<(), EngineError> {
        for old in stored_quests {
            if state.quest(old.id).is_none() {
                self.store.delete_quest(&state.stats.user_id, old.id)?;
            }
        }
        for quest in &state.quests {
            let unchanged = stored_quests.iter().any(|old| old == quest);
            if !unchanged {
                self.store.save_quest(quest)?;
            }
        }

        self.store.save_stats(&state.stats)?;
        Ok(())
    }

    /// Loads, runs `op`, saves. Also returns what the load-time rescan unlocked.
    fn with_player<T, F>(
        &self,
        user_id: &str,
        op: F,
    ) -> Result<(T, Vec<UnlockedAchievement>), EngineError>
    where
        F: FnOnce(&RewardEngine, &mut PlayerState, NaiveDateTime) -> Result<T, EngineError>,
    {
        self.locked(user_id, || {
            let now = self.clock.now();
            let (loaded, stored_quests) = self.load(user_id, now)?;
            let mut state = loaded.state;
            let result = op(&self.engine, &mut state, now)?;
            self.persist(&state, &stored_quests)?;
            Ok((result, loaded.unlocked))
        })
    }

    /// Loads a player, creating a fresh one on first sight.
    ///
    /// Stored stats are repaired, expired quests are dropped, missing daily
    /// and weekly quests are generated and achievements are re-scanned; the
    /// result is saved before returning.
    pub fn load_player(&self, user_id: &str) -> Result<LoadedPlayer, EngineError> {
        self.locked(user_id, || {
            let now = self.clock.now();
            let (loaded, stored_quests) = self.load(user_id, now)?;
            self.persist(&loaded.state, &stored_quests)?;
            Ok(loaded)
        })
    }

    /// Routes `event`. Achievements unlocked while loading come first in the
    /// outcome.
    pub fn apply_event(
        &self,
        user_id: &str,
        event: &GameEvent,
    ) -> Result<EventOutcome, EngineError> {
        let (mut outcome, on_load) = self.with_player(user_id, |engine, state, now| {
            Ok(engine.apply_event(state, event, now))
        })?;
        prepend_unlocked(&mut outcome.unlocked, on_load);
        Ok(outcome)
    }

    /// Records a new task. Its rewards were locked by `Task::new`.
    pub fn create_task(&self, user_id: &str, task: &Task) -> Result<EventOutcome, EngineError> {
        debug!(user = user_id, task = %task.id, xp = task.xp_reward, "task created");
        self.apply_event(user_id, &GameEvent::TaskCreated)
    }

    pub fn record_subtask_created(&self, user_id: &str) -> Result<EventOutcome, EngineError> {
        self.apply_event(user_id, &GameEvent::SubtaskCreated)
    }

    /// Completes `task` and routes the rewards. Completing a task twice is
    /// a no-op with an empty outcome.
    pub fn complete_task(
        &self,
        user_id: &str,
        task: &mut Task,
        open_tasks_due_today: Option<u32>,
    ) -> Result<EventOutcome, EngineError> {
        if task.is_completed() {
            debug!(user = user_id, task = %task.id, "task already completed");
            return Ok(EventOutcome::default());
        }
        let ((mut outcome, completed_at), on_load) =
            self.with_player(user_id, |engine, state, now| {
                let completion = TaskCompletion::from_task(task, now, open_tasks_due_today);
                let event = GameEvent::TaskCompleted(completion);
                Ok((engine.apply_event(state, &event, now), now))
            })?;
        prepend_unlocked(&mut outcome.unlocked, on_load);
        task.status = TaskStatus::Completed;
        task.completed_at = Some(completed_at);
        Ok(outcome)
    }

    /// Marks an open task failed. Finished tasks are left alone.
    pub fn fail_task(&self, user_id: &str, task: &mut Task) -> Result<EventOutcome, EngineError> {
        if matches!(task.status, TaskStatus::Completed | TaskStatus::Failed) {
            return Ok(EventOutcome::default());
        }
        let outcome = self.apply_event(user_id, &GameEvent::TaskFailed)?;
        task.status = TaskStatus::Failed;
        Ok(outcome)
    }

    pub fn record_login(&self, user_id: &str) -> Result<EventOutcome, EngineError> {
        self.apply_event(user_id, &GameEvent::Login)
    }

    pub fn update_streak(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> Result<EventOutcome, EngineError> {
        let (mut outcome, on_load) = self.with_player(user_id, |engine, state, now| {
            Ok(engine.update_streak(state, day, now))
        })?;
        prepend_unlocked(&mut outcome.unlocked, on_load);
        Ok(outcome)
    }

    /// Claims a quest. Claims that cannot happen return zero rewards.
    pub fn claim_quest(&self, user_id: &str, quest_id: Uuid) -> Result<ClaimOutcome, EngineError> {
        let (mut outcome, on_load) = self.with_player(user_id, |engine, state, now| {
            Ok(engine.claim_quest(state, quest_id, now))
        })?;
        prepend_unlocked(&mut outcome.unlocked, on_load);
        Ok(outcome)
    }

    pub fn activate_special_quest(
        &self,
        user_id: &str,
        template_id: &str,
    ) -> Result<Option<Quest>, EngineError> {
        self.with_player(user_id, |engine, state, now| {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| EngineError::LockPoisoned(user_id.to_string()))?;
            Ok(engine.activate_special_quest(state, template_id, now, &mut *rng))
        })
        .map(|(quest, _)| quest)
    }

    pub fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
    ) -> Result<Vec<UnlockedAchievement>, EngineError> {
        let (unlocked, mut on_load) = self.with_player(user_id, |engine, state, _| {
            engine.unlock_achievement(state, achievement_id)
        })?;
        on_load.extend(unlocked);
        Ok(on_load)
    }

    /// Nothing is saved when the wallet is short.
    pub fn spend_coins(&self, user_id: &str, amount: u64) -> Result<u64, EngineError> {
        self.with_player(user_id, |engine, state, _| {
            engine.spend_coins(state, amount)?;
            Ok(state.stats.coins)
        })
        .map(|(coins, _)| coins)
    }

    /// Nothing is saved when the wallet is short.
    pub fn spend_gems(&self, user_id: &str, amount: u64) -> Result<u64, EngineError> {
        self.with_player(user_id, |engine, state, _| {
            engine.spend_gems(state, amount)?;
            Ok(state.stats.gems)
        })
        .map(|(gems, _)| gems)
    }
}

fn prepend_unlocked(
    unlocked: &mut Vec<UnlockedAchievement>,
    on_load: Vec<UnlockedAchievement>,
) {
    if on_load.is_empty() {
        return;
    }
    let later = std::mem::replace(unlocked, on_load);
    unlocked.extend(later);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::engine::Notification;
    use crate::store::MemoryStore;
    use crate::tasks::{Difficulty, Priority};

    fn service() -> GameService<MemoryStore, FixedClock> {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        GameService::with_seed(MemoryStore::new(), clock, CatalogConfig::builtin(), 7)
    }

    #[test]
    fn test_first_load_creates_and_persists() {
        let svc = service();
        let loaded = svc.load_player("alice").unwrap();
        assert!(loaded.is_new);
        assert_eq!(loaded.generation.created.len(), 5);
        assert!(loaded.unlocked.iter().any(|u| u.id == "welcome"));

        let again = svc.load_player("alice").unwrap();
        assert!(!again.is_new);
        assert!(again.generation.is_empty());
        assert!(again.unlocked.is_empty());
        assert_eq!(svc.store().load_quests("alice").unwrap().len(), 5);
    }

    #[test]
    fn test_complete_task_twice_is_noop() {
        let svc = service();
        let mut task = Task::new("Inbox zero", Difficulty::Easy, Priority::None);
        let first = svc.complete_task("bob", &mut task, None).unwrap();
        assert_eq!(first.xp.unwrap().total, 10);
        assert!(task.is_completed());

        let second = svc.complete_task("bob", &mut task, None).unwrap();
        assert!(second.is_empty());
        let stats = svc.store().load_stats("bob").unwrap().unwrap();
        assert_eq!(stats.tasks_completed, 1);
    }

    #[test]
    fn test_failed_spend_is_not_saved() {
        let svc = service();
        assert!(matches!(
            svc.spend_coins("carol", 1_000_000),
            Err(EngineError::InsufficientFunds { .. })
        ));
        assert_eq!(svc.spend_gems("carol", 4).unwrap(), 6);
        let stats = svc.store().load_stats("carol").unwrap().unwrap();
        assert_eq!(stats.gems, 6);
    }

    #[test]
    fn test_first_event_reports_load_time_unlocks() {
        let svc = service();
        let outcome = svc.record_login("dana").unwrap();
        assert_eq!(outcome.unlocked[0].id, "welcome");
        assert!(outcome.notifications().iter().any(|n| matches!(
            n,
            Notification::AchievementUnlocked { id, .. } if id == "welcome"
        )));

        let again = svc.record_login("dana").unwrap();
        assert!(again.unlocked.iter().all(|u| u.id != "welcome"));
    }

    #[test]
    fn test_manual_unlock_includes_load_time_unlocks() {
        let svc = service();
        let unlocked = svc.unlock_achievement("erin", "tasks_1000").unwrap();
        let ids: Vec<&str> = unlocked.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids[..2], ["welcome", "tasks_1000"]);
    }

    #[test]
    fn test_user_locks_are_released() {
        let svc = service();
        for user in ["u1", "u2", "u3"] {
            svc.load_player(user).unwrap();
            svc.record_login(user).unwrap();
        }
        assert!(svc.spend_coins("u1", 1_000_000).is_err());
        assert_eq!(svc.tracked_locks(), 0);

        let held = svc.user_lock("u1").unwrap();
        svc.load_player("u1").unwrap();
        assert_eq!(svc.tracked_locks(), 1);
        drop(held);
        svc.load_player("u1").unwrap();
        assert_eq!(svc.tracked_locks(), 0);
    }
}
