//! Player stats aggregate.

use crate::core::constants::{DEFAULT_CATEGORIES, STARTING_COINS, STARTING_GEMS};
use crate::core::leveling::xp_for_level;
use crate::utils::serde_helpers::{non_negative, non_negative_u32};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category completion totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStat {
    #[serde(deserialize_with = "non_negative")]
    pub tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub total_xp: u64,
}

/// Everything the engine tracks for one player.
///
/// Counters are unsigned and deserialize leniently: negative or fractional
/// values from an imported backup clamp instead of failing the load. Derived
/// level fields are recomputed by `sanitize()` rather than trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub user_id: String,

    // Level
    #[serde(deserialize_with = "non_negative_u32")]
    pub level: u32,
    #[serde(deserialize_with = "non_negative")]
    pub current_xp: u64,
    #[serde(deserialize_with = "non_negative")]
    pub total_xp: u64,
    #[serde(deserialize_with = "non_negative")]
    pub xp_to_next_level: u64,

    // Streak
    #[serde(deserialize_with = "non_negative_u32")]
    pub current_streak: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub longest_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    #[serde(deserialize_with = "non_negative")]
    pub streak_recoveries: u64,
    /// Set when a streak was lost; cleared once the new streak continues.
    pub streak_recovery_pending: bool,

    // Task and quest counters
    #[serde(deserialize_with = "non_negative")]
    pub tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub tasks_created: u64,
    #[serde(deserialize_with = "non_negative")]
    pub tasks_failed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub quests_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub daily_quests_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub subtasks_created: u64,

    // Rolling windows
    #[serde(deserialize_with = "non_negative")]
    pub daily_xp: u64,
    #[serde(deserialize_with = "non_negative")]
    pub weekly_xp: u64,
    #[serde(deserialize_with = "non_negative")]
    pub daily_tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub weekly_tasks_completed: u64,
    pub last_daily_reset: Option<NaiveDate>,
    pub last_weekly_reset: Option<NaiveDate>,

    // Achievement trigger counters
    pub category_stats: BTreeMap<String, CategoryStat>,
    #[serde(deserialize_with = "non_negative")]
    pub epic_tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub legendary_tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub hard_tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub high_priority_tasks_completed: u64,
    #[serde(deserialize_with = "non_negative")]
    pub early_completions: u64,
    #[serde(deserialize_with = "non_negative")]
    pub late_completions: u64,
    #[serde(deserialize_with = "non_negative")]
    pub perfect_days: u64,
    pub last_perfect_day: Option<NaiveDate>,
    #[serde(deserialize_with = "non_negative")]
    pub weekend_tasks: u64,
    #[serde(deserialize_with = "non_negative")]
    pub perfect_tasks_completed: u64,

    // Achievements (append-only, insertion ordered)
    pub achievements_unlocked: Vec<String>,
    #[serde(deserialize_with = "non_negative")]
    pub achievement_points: u64,

    // Wallet
    #[serde(deserialize_with = "non_negative")]
    pub coins: u64,
    #[serde(deserialize_with = "non_negative")]
    pub gems: u64,

    pub last_login_date: Option<NaiveDate>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            level: 1,
            current_xp: 0,
            total_xp: 0,
            xp_to_next_level: xp_for_level(1),
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
            streak_recoveries: 0,
            streak_recovery_pending: false,
            tasks_completed: 0,
            tasks_created: 0,
            tasks_failed: 0,
            quests_completed: 0,
            daily_quests_completed: 0,
            subtasks_created: 0,
            daily_xp: 0,
            weekly_xp: 0,
            daily_tasks_completed: 0,
            weekly_tasks_completed: 0,
            last_daily_reset: None,
            last_weekly_reset: None,
            category_stats: BTreeMap::new(),
            epic_tasks_completed: 0,
            legendary_tasks_completed: 0,
            hard_tasks_completed: 0,
            high_priority_tasks_completed: 0,
            early_completions: 0,
            late_completions: 0,
            perfect_days: 0,
            last_perfect_day: None,
            weekend_tasks: 0,
            perfect_tasks_completed: 0,
            achievements_unlocked: Vec::new(),
            achievement_points: 0,
            coins: 0,
            gems: 0,
            last_login_date: None,
        }
    }
}

impl PlayerStats {
    /// Fresh player with the starting wallet.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            coins: STARTING_COINS,
            gems: STARTING_GEMS,
            ..Default::default()
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements_unlocked.iter().any(|a| a == id)
    }

    /// Highest completion count across all categories.
    pub fn max_category_tasks(&self) -> u64 {
        self.category_stats
            .values()
            .map(|c| c.tasks_completed)
            .max()
            .unwrap_or(0)
    }

    /// Whether every default category has at least `min` completions.
    pub fn all_categories_at_least(&self, min: u64) -> bool {
        DEFAULT_CATEGORIES.iter().all(|name| {
            self.category_stats
                .get(*name)
                .map(|c| c.tasks_completed)
                .unwrap_or(0)
                >= min
        })
    }
}
