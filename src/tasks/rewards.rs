//! Task reward math: XP/coins from difficulty and priority, streak boost on grant.

use super::types::{Difficulty, Priority};
use crate::core::constants::STREAK_BONUSES;
use serde::{Deserialize, Serialize};

/// Rewards stored on a task when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskRewards {
    pub xp: u64,
    pub coins: u64,
}

pub fn xp_reward(difficulty: Difficulty, priority: Priority) -> u64 {
    difficulty.base_xp() + priority.xp_bonus()
}

pub fn coin_reward(difficulty: Difficulty) -> u64 {
    difficulty.base_xp() / 2
}

pub fn calculate_task_rewards(difficulty: Difficulty, priority: Priority) -> TaskRewards {
    TaskRewards {
        xp: xp_reward(difficulty, priority),
        coins: coin_reward(difficulty),
    }
}

/// Streak bonus in percent: highest threshold <= streak wins, 0 below 3 days.
pub fn streak_bonus_percent(streak: u32) -> u64 {
    STREAK_BONUSES
        .iter()
        .rev()
        .find(|(days, _)| streak >= *days)
        .map(|(_, percent)| *percent)
        .unwrap_or(0)
}

/// Streak bonus as a multiplier fraction (0.25 for a 7-day streak).
pub fn streak_bonus(streak: u32) -> f64 {
    streak_bonus_percent(streak) as f64 / 100.0
}

/// XP actually granted for a task, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XpGrant {
    pub base: u64,
    pub bonus: u64,
    pub total: u64,
}

/// `floor(base * (1 + percent/100))`, computed in integers.
pub fn apply_streak_bonus(base: u64, bonus_percent: u64) -> XpGrant {
    let total = base.saturating_mul(100 + bonus_percent) / 100;
    XpGrant {
        base,
        bonus: total - base,
        total,
    }
}
