// XP and leveling
pub const XP_PER_LEVEL_BASE: u64 = 100;
pub const XP_LEVEL_MULTIPLIER: f64 = 1.5;

// Streak bonus table: (minimum streak days, bonus percent applied to task XP).
// Highest threshold <= streak wins.
pub const STREAK_BONUSES: [(u32, u64); 7] = [
    (3, 10),
    (7, 25),
    (14, 50),
    (30, 75),
    (60, 100),
    (100, 150),
    (365, 200),
];

// Rank titles, keyed by the first level that earns them
pub const LEVEL_TITLES: [(u32, &str); 13] = [
    (1, "Novice"),
    (5, "Apprentice"),
    (10, "Initiate"),
    (15, "Adept"),
    (20, "Adventurer"),
    (25, "Explorer"),
    (30, "Veteran"),
    (40, "Expert"),
    (50, "Master"),
    (60, "Grandmaster"),
    (75, "Champion"),
    (90, "Hero"),
    (100, "Legend"),
];

// Starting wallet for a fresh player
pub const STARTING_COINS: u64 = 100;
pub const STARTING_GEMS: u64 = 10;

// Quest generation
pub const DAILY_QUEST_COUNT: usize = 3;
pub const WEEKLY_QUEST_COUNT: usize = 2;
pub const SPECIAL_QUEST_DURATION_DAYS: i64 = 30;

// Task categories every player starts with. `all_categories` achievements
// require progress in each of these.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Work", "Personal", "Health", "Learning", "Finance", "Social", "Leisure", "Home",
];

// Data directory under $HOME for JSON saves and catalog overrides
pub const DATA_DIR_NAME: &str = ".questify";
pub const ACHIEVEMENT_CATALOG_FILE: &str = "achievements.json";
pub const QUEST_CATALOG_FILE: &str = "quest_templates.json";
