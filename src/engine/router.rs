//! Central event dispatch.
//!
//! Every stat-changing operation goes through [`RewardEngine`] so that the
//! order of streak, XP, counters, achievements and quests is fixed in one
//! place. The engine itself holds only the shared catalogs; player state is
//! passed in and mutated in place, persistence is the caller's job.

use super::events::{ClaimOutcome, CompletedQuest, EventOutcome, GameEvent, TaskCompletion};
use crate::achievements::{
    check_comeback, check_kinds, scan_all, unlock_achievement, AchievementCatalog,
    RequirementKind, UnlockedAchievement,
};
use crate::config::CatalogConfig;
use crate::error::EngineError;
use crate::quests::{
    activate_special_quest, apply_quest_event, claim_quest, generate_quests, GenerationReport,
    Quest, QuestCatalog, QuestEvent,
};
use crate::stats::{register_completion, LevelUp, PlayerStats, StreakUpdate};
use crate::tasks::{apply_streak_bonus, streak_bonus_percent, Difficulty};
use crate::utils::dates::{days_between, is_weekend};
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

const STREAK_KINDS: &[RequirementKind] = &[
    RequirementKind::Streak,
    RequirementKind::StreakRecovered,
];

const XP_KINDS: &[RequirementKind] = &[
    RequirementKind::Level,
    RequirementKind::TotalXp,
    RequirementKind::DailyXp,
    RequirementKind::Coins,
];

/// One player's mutable aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub stats: PlayerStats,
    pub quests: Vec<Quest>,
}

impl PlayerState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            stats: PlayerStats::new(user_id),
            quests: Vec::new(),
        }
    }

    pub fn quest(&self, id: Uuid) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewardEngine {
    catalogs: CatalogConfig,
}

impl RewardEngine {
    pub fn new(catalogs: CatalogConfig) -> Self {
        Self { catalogs }
    }

    pub fn achievements(&self) -> &AchievementCatalog {
        &self.catalogs.achievements
    }

    pub fn quest_catalog(&self) -> &QuestCatalog {
        &self.catalogs.quests
    }

    /// Routes a domain event. Daily and weekly windows roll over first.
    pub fn apply_event(
        &self,
        state: &mut PlayerState,
        event: &GameEvent,
        now: NaiveDateTime,
    ) -> EventOutcome {
        let level_before = state.stats.level;
        state.stats.roll_over(now.date());
        debug!(user = %state.stats.user_id, event = ?event, "routing event");

        let mut outcome = match event {
            GameEvent::TaskCompleted(completion) => self.task_completed(state, completion, now),
            GameEvent::TaskCreated => {
                state.stats.tasks_created += 1;
                EventOutcome::default()
            }
            GameEvent::SubtaskCreated => {
                state.stats.subtasks_created += 1;
                EventOutcome::default()
            }
            GameEvent::TaskFailed => {
                state.stats.tasks_failed += 1;
                EventOutcome::default()
            }
            GameEvent::Login => self.login(state, now.date()),
        };

        outcome
            .unlocked
            .extend(scan_all(&mut state.stats, self.achievements()));
        outcome.level_up = LevelUp::between(level_before, state.stats.level);
        if let Some(level_up) = outcome.level_up {
            info!(
                user = %state.stats.user_id,
                level = level_up.new_level,
                "level up"
            );
        }
        outcome
    }

    // Order: streak, XP with streak bonus, counters, full scan, quests.
    // Achievements and quests both see the post-update stats.
    fn task_completed(
        &self,
        state: &mut PlayerState,
        completion: &TaskCompletion,
        now: NaiveDateTime,
    ) -> EventOutcome {
        let stats = &mut state.stats;
        let day = completion.completed_at.date();
        let mut outcome = EventOutcome::default();

        let streak = register_completion(stats, day);
        outcome
            .unlocked
            .extend(check_kinds(stats, self.achievements(), STREAK_KINDS));

        let grant = apply_streak_bonus(
            completion.xp_reward,
            streak_bonus_percent(stats.current_streak),
        );
        stats.gain_xp(grant.total);
        stats.add_coins(completion.coin_reward);
        outcome
            .unlocked
            .extend(check_kinds(stats, self.achievements(), XP_KINDS));

        record_completion_counters(stats, completion, grant.total, day);
        outcome
            .unlocked
            .extend(scan_all(stats, self.achievements()));

        info!(
            user = %stats.user_id,
            task = %completion.task_id,
            xp = grant.total,
            bonus = grant.bonus,
            coins = completion.coin_reward,
            streak = stats.current_streak,
            "task completed"
        );

        outcome.streak = Some(streak);
        outcome.xp = Some(grant);
        outcome.coins_gained = completion.coin_reward;

        let mut events = Vec::with_capacity(3);
        if streak.changed() {
            events.push(QuestEvent::StreakUpdated {
                streak: streak.current,
            });
        }
        events.push(QuestEvent::TaskCompleted {
            category: completion.category.clone(),
            priority: completion.priority,
        });
        events.push(QuestEvent::XpGained {
            amount: grant.total,
        });
        self.fan_out_quests(state, &events, now, &mut outcome);

        outcome
    }

    fn login(&self, state: &mut PlayerState, today: NaiveDate) -> EventOutcome {
        let stats = &mut state.stats;
        let mut outcome = EventOutcome::default();
        if let Some(last) = stats.last_login_date {
            let days_away = days_between(last, today);
            if days_away > 0 {
                outcome
                    .unlocked
                    .extend(check_comeback(stats, self.achievements(), days_away));
            }
        }
        if stats.last_login_date.map_or(true, |last| today > last) {
            stats.last_login_date = Some(today);
        }
        outcome
    }

    fn fan_out_quests(
        &self,
        state: &mut PlayerState,
        events: &[QuestEvent],
        now: NaiveDateTime,
        outcome: &mut EventOutcome,
    ) {
        for event in events {
            let progress = apply_quest_event(&mut state.quests, event, now);
            for p in progress.iter().filter(|p| p.quest_completed) {
                if outcome.completed_quests.iter().any(|q| q.quest_id == p.quest_id) {
                    continue;
                }
                if let Some(quest) = state.quest(p.quest_id) {
                    info!(user = %state.stats.user_id, quest = %quest.title, "quest completed");
                    outcome.completed_quests.push(CompletedQuest {
                        quest_id: quest.id,
                        title: quest.title.clone(),
                    });
                }
            }
            outcome.quest_progress.extend(progress);
        }
    }

    /// Registers a streak day without a task completion.
    pub fn update_streak(
        &self,
        state: &mut PlayerState,
        day: NaiveDate,
        now: NaiveDateTime,
    ) -> EventOutcome {
        let level_before = state.stats.level;
        state.stats.roll_over(now.date());

        let streak: StreakUpdate = register_completion(&mut state.stats, day);
        let mut outcome = EventOutcome {
            streak: Some(streak),
            ..Default::default()
        };
        outcome
            .unlocked
            .extend(check_kinds(&mut state.stats, self.achievements(), STREAK_KINDS));
        outcome
            .unlocked
            .extend(scan_all(&mut state.stats, self.achievements()));
        if streak.changed() {
            let event = QuestEvent::StreakUpdated {
                streak: streak.current,
            };
            self.fan_out_quests(state, &[event], now, &mut outcome);
        }
        outcome.level_up = LevelUp::between(level_before, state.stats.level);
        outcome
    }

    /// Claims a quest's rewards at most once, then re-scans achievements.
    pub fn claim_quest(
        &self,
        state: &mut PlayerState,
        quest_id: Uuid,
        now: NaiveDateTime,
    ) -> ClaimOutcome {
        let level_before = state.stats.level;
        state.stats.roll_over(now.date());

        let Some(claimed) = claim_quest(&mut state.quests, &mut state.stats, quest_id, now) else {
            return ClaimOutcome::default();
        };
        let unlocked = scan_all(&mut state.stats, self.achievements());
        ClaimOutcome {
            rewards: claimed.rewards,
            claimed: Some(claimed),
            level_up: LevelUp::between(level_before, state.stats.level),
            unlocked,
        }
    }

    /// Drops expired quests and tops up dailies and weeklies.
    pub fn refresh_quests<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> GenerationReport {
        let user_id = state.stats.user_id.clone();
        generate_quests(&mut state.quests, &user_id, self.quest_catalog(), now, rng)
    }

    pub fn activate_special_quest<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        template_id: &str,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Option<Quest> {
        let user_id = state.stats.user_id.clone();
        activate_special_quest(
            &mut state.quests,
            &user_id,
            self.quest_catalog(),
            template_id,
            now,
            rng,
        )
    }

    /// Full re-scan. Safe to repeat.
    pub fn rescan(&self, state: &mut PlayerState) -> Vec<UnlockedAchievement> {
        scan_all(&mut state.stats, self.achievements())
    }

    /// Grants a specific achievement regardless of its requirement.
    ///
    /// Returns every unlock that resulted (the requested one first, then any
    /// cascade), or an empty list if it was already unlocked.
    pub fn unlock_achievement(
        &self,
        state: &mut PlayerState,
        id: &str,
    ) -> Result<Vec<UnlockedAchievement>, EngineError> {
        let def = self
            .achievements()
            .get(id)
            .ok_or_else(|| EngineError::UnknownAchievement(id.to_string()))?;
        let Some(first) = unlock_achievement(&mut state.stats, def) else {
            return Ok(Vec::new());
        };
        let mut unlocked = vec![first];
        unlocked.extend(self.rescan(state));
        Ok(unlocked)
    }

    pub fn spend_coins(&self, state: &mut PlayerState, amount: u64) -> Result<(), EngineError> {
        state.stats.spend_coins(amount)
    }

    pub fn spend_gems(&self, state: &mut PlayerState, amount: u64) -> Result<(), EngineError> {
        state.stats.spend_gems(amount)
    }
}

fn record_completion_counters(
    stats: &mut PlayerStats,
    completion: &TaskCompletion,
    xp: u64,
    day: NaiveDate,
) {
    stats.tasks_completed += 1;
    stats.daily_tasks_completed += 1;
    stats.weekly_tasks_completed += 1;

    if let Some(category) = &completion.category {
        let entry = stats.category_stats.entry(category.clone()).or_default();
        entry.tasks_completed += 1;
        entry.total_xp = entry.total_xp.saturating_add(xp);
    }

    match completion.difficulty {
        Difficulty::Hard => stats.hard_tasks_completed += 1,
        Difficulty::Epic => stats.epic_tasks_completed += 1,
        Difficulty::Legendary => stats.legendary_tasks_completed += 1,
        _ => {}
    }
    if completion.priority.is_high() {
        stats.high_priority_tasks_completed += 1;
    }
    if completion.is_early() {
        stats.early_completions += 1;
    }
    if completion.is_late() {
        stats.late_completions += 1;
    }
    if is_weekend(day) {
        stats.weekend_tasks += 1;
    }
    if completion.is_perfect() {
        stats.perfect_tasks_completed += 1;
    }
    if completion.open_tasks_due_today == Some(0) && stats.last_perfect_day != Some(day) {
        stats.perfect_days += 1;
        stats.last_perfect_day = Some(day);
    }
}
