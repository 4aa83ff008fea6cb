//! Achievement catalog types.

use crate::stats::LevelUp;
use serde::{Deserialize, Serialize};

/// Achievement categories for organization in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Tasks,
    Streaks,
    Xp,
    Social,
    Special,
    Collection,
    Time,
    Categories,
}

impl AchievementCategory {
    /// All categories in display order.
    pub const ALL: [AchievementCategory; 8] = [
        AchievementCategory::Tasks,
        AchievementCategory::Streaks,
        AchievementCategory::Xp,
        AchievementCategory::Social,
        AchievementCategory::Special,
        AchievementCategory::Collection,
        AchievementCategory::Time,
        AchievementCategory::Categories,
    ];

    /// Display name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            AchievementCategory::Tasks => "Tasks",
            AchievementCategory::Streaks => "Streaks",
            AchievementCategory::Xp => "Experience",
            AchievementCategory::Social => "Social",
            AchievementCategory::Special => "Special",
            AchievementCategory::Collection => "Collection",
            AchievementCategory::Time => "Time",
            AchievementCategory::Categories => "Categories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Which stat a requirement is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    TasksCompleted,
    Streak,
    Level,
    TotalXp,
    DailyXp,
    DailyTasks,
    Achievements,
    QuestsCompleted,
    DailyQuests,
    EpicTasks,
    LegendaryTasks,
    HardTasks,
    HighPriorityTasks,
    EarlyCompletion,
    LateCompletion,
    PerfectDay,
    WeekendTasks,
    /// Best single category.
    CategoryTasks,
    /// Every default category.
    AllCategories,
    PerfectTasks,
    Coins,
    StreakRecovered,
    SubtasksCreated,
    AccountCreated,
    /// Days away since the previous login; only checked on login.
    Comeback,
    /// Anything a loaded catalog names that this engine does not know.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    pub value: u64,
}

/// Static definition of an achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: AchievementRarity,
    pub category: AchievementCategory,
    #[serde(default)]
    pub xp_reward: u64,
    #[serde(default)]
    pub coin_reward: u64,
    pub requirement: Requirement,
    #[serde(default)]
    pub secret: bool,
}

/// Record of an achievement granted during an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub xp_reward: u64,
    pub coin_reward: u64,
    /// Level change caused by the achievement's own XP reward.
    pub level_up: Option<LevelUp>,
}
