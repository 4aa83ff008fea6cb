//! Achievement catalog and evaluator.
//!
//! Definitions are static data; per-player state is only the list of
//! unlocked ids on `PlayerStats`.

pub mod data;
pub mod evaluator;
pub mod types;

pub use data::AchievementCatalog;
pub use evaluator::{check_comeback, check_kinds, requirement_met, scan_all, unlock_achievement};
pub use types::{
    AchievementCategory, AchievementDef, AchievementRarity, Requirement, RequirementKind,
    UnlockedAchievement,
};
