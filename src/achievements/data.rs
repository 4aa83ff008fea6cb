//! Static achievement definitions and the catalog wrapper.

use super::types::{
    AchievementCategory, AchievementDef, AchievementRarity, Requirement, RequirementKind,
};
use crate::config::CatalogError;
use crate::stats::PlayerStats;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::warn;

struct BuiltinAchievement {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    rarity: AchievementRarity,
    category: AchievementCategory,
    xp_reward: u64,
    coin_reward: u64,
    kind: RequirementKind,
    value: u64,
    secret: bool,
}

use AchievementCategory as Cat;
use AchievementRarity as Rarity;
use RequirementKind as Req;

/// All built-in achievements in display order.
const BUILTIN_ACHIEVEMENTS: &[BuiltinAchievement] = &[
    // ═══════════════════════════════════════════════════════════════
    // TASKS
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "welcome",
        name: "Welcome, Adventurer",
        description: "Create your account",
        icon: "👋",
        rarity: Rarity::Common,
        category: Cat::Special,
        xp_reward: 10,
        coin_reward: 0,
        kind: Req::AccountCreated,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "first_task",
        name: "First Step",
        description: "Complete your first task",
        icon: "✅",
        rarity: Rarity::Common,
        category: Cat::Tasks,
        xp_reward: 10,
        coin_reward: 5,
        kind: Req::TasksCompleted,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "tasks_10",
        name: "Getting Things Done",
        description: "Complete 10 tasks",
        icon: "📋",
        rarity: Rarity::Common,
        category: Cat::Tasks,
        xp_reward: 25,
        coin_reward: 10,
        kind: Req::TasksCompleted,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "tasks_50",
        name: "Taskmaster",
        description: "Complete 50 tasks",
        icon: "📋",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 75,
        coin_reward: 30,
        kind: Req::TasksCompleted,
        value: 50,
        secret: false,
    },
    BuiltinAchievement {
        id: "tasks_100",
        name: "Centurion",
        description: "Complete 100 tasks",
        icon: "🏛️",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 150,
        coin_reward: 60,
        kind: Req::TasksCompleted,
        value: 100,
        secret: false,
    },
    BuiltinAchievement {
        id: "tasks_500",
        name: "Unstoppable",
        description: "Complete 500 tasks",
        icon: "🚂",
        rarity: Rarity::Epic,
        category: Cat::Tasks,
        xp_reward: 400,
        coin_reward: 200,
        kind: Req::TasksCompleted,
        value: 500,
        secret: false,
    },
    BuiltinAchievement {
        id: "tasks_1000",
        name: "Legend of Productivity",
        description: "Complete 1,000 tasks",
        icon: "👑",
        rarity: Rarity::Legendary,
        category: Cat::Tasks,
        xp_reward: 1000,
        coin_reward: 500,
        kind: Req::TasksCompleted,
        value: 1000,
        secret: false,
    },
    BuiltinAchievement {
        id: "daily_tasks_10",
        name: "Marathon Day",
        description: "Complete 10 tasks in a single day",
        icon: "🏃",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::DailyTasks,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "epic_first",
        name: "Epic Hero",
        description: "Complete an epic task",
        icon: "🗡️",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::EpicTasks,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "legendary_first",
        name: "Living Legend",
        description: "Complete a legendary task",
        icon: "🐉",
        rarity: Rarity::Epic,
        category: Cat::Tasks,
        xp_reward: 100,
        coin_reward: 50,
        kind: Req::LegendaryTasks,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "hard_10",
        name: "Hard Worker",
        description: "Complete 10 hard tasks",
        icon: "🔨",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::HardTasks,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "high_priority_25",
        name: "Firefighter",
        description: "Complete 25 high or critical priority tasks",
        icon: "🧯",
        rarity: Rarity::Rare,
        category: Cat::Tasks,
        xp_reward: 75,
        coin_reward: 30,
        kind: Req::HighPriorityTasks,
        value: 25,
        secret: false,
    },
    BuiltinAchievement {
        id: "perfect_tasks_10",
        name: "Perfectionist",
        description: "Finish 10 tasks on time with every subtask done",
        icon: "💎",
        rarity: Rarity::Epic,
        category: Cat::Tasks,
        xp_reward: 100,
        coin_reward: 50,
        kind: Req::PerfectTasks,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "subtasks_20",
        name: "Planner",
        description: "Create 20 subtasks",
        icon: "🗂️",
        rarity: Rarity::Common,
        category: Cat::Tasks,
        xp_reward: 20,
        coin_reward: 10,
        kind: Req::SubtasksCreated,
        value: 20,
        secret: false,
    },
    // ═══════════════════════════════════════════════════════════════
    // STREAKS
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "streak_3",
        name: "On a Roll",
        description: "Reach a 3-day streak",
        icon: "🔥",
        rarity: Rarity::Common,
        category: Cat::Streaks,
        xp_reward: 20,
        coin_reward: 10,
        kind: Req::Streak,
        value: 3,
        secret: false,
    },
    BuiltinAchievement {
        id: "streak_7",
        name: "Week Warrior",
        description: "Reach a 7-day streak",
        icon: "🔥",
        rarity: Rarity::Rare,
        category: Cat::Streaks,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::Streak,
        value: 7,
        secret: false,
    },
    BuiltinAchievement {
        id: "streak_30",
        name: "Monthly Momentum",
        description: "Reach a 30-day streak",
        icon: "🔥",
        rarity: Rarity::Epic,
        category: Cat::Streaks,
        xp_reward: 200,
        coin_reward: 100,
        kind: Req::Streak,
        value: 30,
        secret: false,
    },
    BuiltinAchievement {
        id: "streak_100",
        name: "Centennial Flame",
        description: "Reach a 100-day streak",
        icon: "☄️",
        rarity: Rarity::Legendary,
        category: Cat::Streaks,
        xp_reward: 500,
        coin_reward: 250,
        kind: Req::Streak,
        value: 100,
        secret: false,
    },
    BuiltinAchievement {
        id: "streak_recovered",
        name: "Back on Track",
        description: "Start a new streak after losing one",
        icon: "🩹",
        rarity: Rarity::Common,
        category: Cat::Streaks,
        xp_reward: 25,
        coin_reward: 10,
        kind: Req::StreakRecovered,
        value: 1,
        secret: false,
    },
    // ═══════════════════════════════════════════════════════════════
    // EXPERIENCE
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "level_5",
        name: "Apprentice",
        description: "Reach level 5",
        icon: "⭐",
        rarity: Rarity::Common,
        category: Cat::Xp,
        xp_reward: 25,
        coin_reward: 10,
        kind: Req::Level,
        value: 5,
        secret: false,
    },
    BuiltinAchievement {
        id: "level_10",
        name: "Adept",
        description: "Reach level 10",
        icon: "🌟",
        rarity: Rarity::Rare,
        category: Cat::Xp,
        xp_reward: 75,
        coin_reward: 30,
        kind: Req::Level,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "level_25",
        name: "Expert",
        description: "Reach level 25",
        icon: "💫",
        rarity: Rarity::Epic,
        category: Cat::Xp,
        xp_reward: 200,
        coin_reward: 100,
        kind: Req::Level,
        value: 25,
        secret: false,
    },
    BuiltinAchievement {
        id: "xp_1000",
        name: "XP Collector",
        description: "Earn 1,000 total XP",
        icon: "✨",
        rarity: Rarity::Common,
        category: Cat::Xp,
        xp_reward: 25,
        coin_reward: 10,
        kind: Req::TotalXp,
        value: 1000,
        secret: false,
    },
    BuiltinAchievement {
        id: "xp_10000",
        name: "XP Hoarder",
        description: "Earn 10,000 total XP",
        icon: "✨",
        rarity: Rarity::Rare,
        category: Cat::Xp,
        xp_reward: 100,
        coin_reward: 50,
        kind: Req::TotalXp,
        value: 10000,
        secret: false,
    },
    BuiltinAchievement {
        id: "daily_xp_200",
        name: "Power Day",
        description: "Earn 200 XP in a single day",
        icon: "⚡",
        rarity: Rarity::Rare,
        category: Cat::Xp,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::DailyXp,
        value: 200,
        secret: false,
    },
    // ═══════════════════════════════════════════════════════════════
    // TIME
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "early_bird",
        name: "Ahead of Schedule",
        description: "Complete 10 tasks before their due date",
        icon: "🐦",
        rarity: Rarity::Rare,
        category: Cat::Time,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::EarlyCompletion,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "better_late",
        name: "Better Late Than Never",
        description: "Complete 5 overdue tasks",
        icon: "🐢",
        rarity: Rarity::Common,
        category: Cat::Time,
        xp_reward: 10,
        coin_reward: 5,
        kind: Req::LateCompletion,
        value: 5,
        secret: true,
    },
    BuiltinAchievement {
        id: "perfect_day",
        name: "Perfect Day",
        description: "Clear every task due today",
        icon: "🌞",
        rarity: Rarity::Rare,
        category: Cat::Time,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::PerfectDay,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "weekend_10",
        name: "Weekend Warrior",
        description: "Complete 10 tasks on weekends",
        icon: "🏖️",
        rarity: Rarity::Common,
        category: Cat::Time,
        xp_reward: 30,
        coin_reward: 15,
        kind: Req::WeekendTasks,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "comeback_7",
        name: "The Return",
        description: "Come back after a week away",
        icon: "🚪",
        rarity: Rarity::Rare,
        category: Cat::Time,
        xp_reward: 30,
        coin_reward: 15,
        kind: Req::Comeback,
        value: 7,
        secret: true,
    },
    // ═══════════════════════════════════════════════════════════════
    // CATEGORIES
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "category_specialist",
        name: "Specialist",
        description: "Complete 25 tasks in one category",
        icon: "🎯",
        rarity: Rarity::Rare,
        category: Cat::Categories,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::CategoryTasks,
        value: 25,
        secret: false,
    },
    BuiltinAchievement {
        id: "balanced_life",
        name: "Balanced Life",
        description: "Complete 5 tasks in every category",
        icon: "⚖️",
        rarity: Rarity::Epic,
        category: Cat::Categories,
        xp_reward: 150,
        coin_reward: 75,
        kind: Req::AllCategories,
        value: 5,
        secret: false,
    },
    // ═══════════════════════════════════════════════════════════════
    // QUESTS AND COLLECTION
    // ═══════════════════════════════════════════════════════════════
    BuiltinAchievement {
        id: "quest_first",
        name: "Adventurer",
        description: "Claim your first quest reward",
        icon: "🗺️",
        rarity: Rarity::Common,
        category: Cat::Special,
        xp_reward: 25,
        coin_reward: 10,
        kind: Req::QuestsCompleted,
        value: 1,
        secret: false,
    },
    BuiltinAchievement {
        id: "quests_25",
        name: "Quest Veteran",
        description: "Claim 25 quest rewards",
        icon: "🧭",
        rarity: Rarity::Epic,
        category: Cat::Special,
        xp_reward: 150,
        coin_reward: 75,
        kind: Req::QuestsCompleted,
        value: 25,
        secret: false,
    },
    BuiltinAchievement {
        id: "daily_quests_10",
        name: "Daily Devotion",
        description: "Claim 10 daily quests",
        icon: "📅",
        rarity: Rarity::Rare,
        category: Cat::Special,
        xp_reward: 50,
        coin_reward: 25,
        kind: Req::DailyQuests,
        value: 10,
        secret: false,
    },
    BuiltinAchievement {
        id: "coins_1000",
        name: "Treasure Hoard",
        description: "Hold 1,000 coins at once",
        icon: "💰",
        rarity: Rarity::Rare,
        category: Cat::Collection,
        xp_reward: 50,
        coin_reward: 0,
        kind: Req::Coins,
        value: 1000,
        secret: false,
    },
    BuiltinAchievement {
        id: "achievements_10",
        name: "Collector",
        description: "Unlock 10 achievements",
        icon: "🏆",
        rarity: Rarity::Epic,
        category: Cat::Collection,
        xp_reward: 100,
        coin_reward: 50,
        kind: Req::Achievements,
        value: 10,
        secret: false,
    },
];

impl BuiltinAchievement {
    fn to_def(&self) -> AchievementDef {
        AchievementDef {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            rarity: self.rarity,
            category: self.category,
            xp_reward: self.xp_reward,
            coin_reward: self.coin_reward,
            requirement: Requirement {
                kind: self.kind,
                value: self.value,
            },
            secret: self.secret,
        }
    }
}

static BUILTIN_CATALOG: Lazy<AchievementCatalog> = Lazy::new(|| AchievementCatalog {
    defs: BUILTIN_ACHIEVEMENTS.iter().map(|a| a.to_def()).collect(),
});

/// Immutable set of achievement definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCatalog {
    defs: Vec<AchievementDef>,
}

impl AchievementCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    ///
    /// Definitions with an unrecognized requirement type are kept but can
    /// never unlock on their own; each one is logged here.
    pub fn new(defs: Vec<AchievementDef>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for def in &defs {
            if !ids.insert(def.id.as_str()) {
                return Err(CatalogError::DuplicateId(def.id.clone()));
            }
        }
        let catalog = Self { defs };
        for id in catalog.unknown_requirements() {
            warn!(
                achievement = id,
                "unrecognized requirement type, achievement can never unlock"
            );
        }
        Ok(catalog)
    }

    /// Ids whose requirement type this engine does not evaluate.
    pub fn unknown_requirements(&self) -> Vec<&str> {
        self.defs
            .iter()
            .filter(|a| a.requirement.kind == RequirementKind::Unknown)
            .map(|a| a.id.as_str())
            .collect()
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> &'static AchievementCatalog {
        &BUILTIN_CATALOG
    }

    /// Parses a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let defs: Vec<AchievementDef> = serde_json::from_str(json)?;
        Self::new(defs)
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDef> {
        self.defs.iter().find(|a| a.id == id)
    }

    pub fn by_category(&self, category: AchievementCategory) -> Vec<&AchievementDef> {
        self.defs.iter().filter(|a| a.category == category).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Unlocked/total counts for a category.
    pub fn count_by_category(
        &self,
        stats: &PlayerStats,
        category: AchievementCategory,
    ) -> (usize, usize) {
        let in_category = self.by_category(category);
        let unlocked = in_category
            .iter()
            .filter(|a| stats.has_achievement(&a.id))
            .count();
        (unlocked, in_category.len())
    }

    /// Unlock percentage (0.0 - 100.0) of this catalog for a player.
    pub fn unlock_percentage(&self, stats: &PlayerStats) -> f32 {
        if self.defs.is_empty() {
            return 0.0;
        }
        let unlocked = self
            .defs
            .iter()
            .filter(|a| stats.has_achievement(&a.id))
            .count();
        (unlocked as f32 / self.defs.len() as f32) * 100.0
    }
}
