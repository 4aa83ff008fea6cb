//! Stat mutations: XP, wallet, rolling windows and invariant repair.

use super::types::PlayerStats;
use crate::core::leveling::level_from_total_xp;
use crate::error::{Currency, EngineError};
use crate::utils::dates::same_iso_week;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A level change caused by an XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub previous_level: u32,
    pub new_level: u32,
}

impl LevelUp {
    /// `Some` only when `after` is above `before`.
    pub fn between(before: u32, after: u32) -> Option<LevelUp> {
        (after > before).then_some(LevelUp {
            previous_level: before,
            new_level: after,
        })
    }
}

impl PlayerStats {
    fn apply_total_xp(&mut self, total_xp: u64) -> Option<LevelUp> {
        let before = self.level;
        let info = level_from_total_xp(total_xp);
        self.total_xp = total_xp;
        self.level = info.level;
        self.current_xp = info.current_xp;
        self.xp_to_next_level = info.xp_to_next_level;
        LevelUp::between(before, info.level)
    }

    /// Earned XP (tasks, quest claims). Counts toward daily/weekly XP.
    pub fn gain_xp(&mut self, amount: u64) -> Option<LevelUp> {
        self.daily_xp = self.daily_xp.saturating_add(amount);
        self.weekly_xp = self.weekly_xp.saturating_add(amount);
        self.apply_total_xp(self.total_xp.saturating_add(amount))
    }

    /// Bonus XP from achievement rewards. Not part of daily/weekly XP.
    pub fn add_reward_xp(&mut self, amount: u64) -> Option<LevelUp> {
        self.apply_total_xp(self.total_xp.saturating_add(amount))
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn add_gems(&mut self, amount: u64) {
        self.gems = self.gems.saturating_add(amount);
    }

    /// Deducts coins, or fails without touching the wallet.
    pub fn spend_coins(&mut self, amount: u64) -> Result<(), EngineError> {
        if self.coins < amount {
            return Err(EngineError::InsufficientFunds {
                currency: Currency::Coins,
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    /// Deducts gems, or fails without touching the wallet.
    pub fn spend_gems(&mut self, amount: u64) -> Result<(), EngineError> {
        if self.gems < amount {
            return Err(EngineError::InsufficientFunds {
                currency: Currency::Gems,
                needed: amount,
                available: self.gems,
            });
        }
        self.gems -= amount;
        Ok(())
    }

    /// Appends an achievement id. Returns false if it was already present.
    pub fn record_unlock(&mut self, id: &str) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.achievements_unlocked.push(id.to_string());
        true
    }

    /// Resets daily counters on a new day and weekly counters on a new ISO week.
    /// Returns true if anything was reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let mut reset = false;

        if self.last_daily_reset != Some(today) {
            if self.last_daily_reset.is_some() {
                self.daily_xp = 0;
                self.daily_tasks_completed = 0;
                reset = true;
            }
            self.last_daily_reset = Some(today);
        }

        match self.last_weekly_reset {
            Some(last) if same_iso_week(last, today) => {}
            Some(_) => {
                self.weekly_xp = 0;
                self.weekly_tasks_completed = 0;
                self.last_weekly_reset = Some(today);
                reset = true;
            }
            None => self.last_weekly_reset = Some(today),
        }

        reset
    }

    /// Repairs invariants on stats that came from storage or an import.
    ///
    /// Level fields are recomputed from `total_xp`, `longest_streak` is raised
    /// to at least `current_streak`, and duplicate achievement ids are dropped.
    /// Returns true if anything had to change.
    pub fn sanitize(&mut self) -> bool {
        let mut repaired = false;

        let info = level_from_total_xp(self.total_xp);
        if self.level != info.level
            || self.current_xp != info.current_xp
            || self.xp_to_next_level != info.xp_to_next_level
        {
            warn!(
                user = %self.user_id,
                stored_level = self.level,
                derived_level = info.level,
                "recomputing level fields from total XP"
            );
            self.level = info.level;
            self.current_xp = info.current_xp;
            self.xp_to_next_level = info.xp_to_next_level;
            repaired = true;
        }

        if self.longest_streak < self.current_streak {
            warn!(user = %self.user_id, "longest streak below current streak");
            self.longest_streak = self.current_streak;
            repaired = true;
        }

        let before = self.achievements_unlocked.len();
        let mut seen = std::collections::HashSet::new();
        self.achievements_unlocked.retain(|id| seen.insert(id.clone()));
        if self.achievements_unlocked.len() != before {
            warn!(user = %self.user_id, "dropped duplicate achievement ids");
            repaired = true;
        }

        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_gain_xp_levels_up_at_boundary() {
        let mut stats = PlayerStats::new("p");
        assert!(stats.gain_xp(99).is_none());
        assert_eq!(stats.level, 1);

        let level_up = stats.gain_xp(1).expect("should level up");
        assert_eq!(level_up.previous_level, 1);
        assert_eq!(level_up.new_level, 2);
        assert_eq!(stats.total_xp, 100);
        assert_eq!(stats.current_xp, 0);
        assert_eq!(stats.xp_to_next_level, 150);
        assert_eq!(stats.daily_xp, 100);
        assert_eq!(stats.weekly_xp, 100);
    }

    #[test]
    fn test_gain_xp_multiple_levels() {
        let mut stats = PlayerStats::new("p");
        let level_up = stats.gain_xp(100 + 150 + 225).unwrap();
        assert_eq!(level_up.new_level, 4);
        assert_eq!(stats.current_xp, 0);
    }

    #[test]
    fn test_reward_xp_skips_daily_window() {
        let mut stats = PlayerStats::new("p");
        stats.add_reward_xp(50);
        assert_eq!(stats.total_xp, 50);
        assert_eq!(stats.daily_xp, 0);
        assert_eq!(stats.weekly_xp, 0);
    }

    #[test]
    fn test_spend_coins_insufficient_leaves_wallet() {
        let mut stats = PlayerStats::new("p");
        let err = stats.spend_coins(101).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientFunds {
                currency: Currency::Coins,
                needed: 101,
                available: 100
            }
        ));
        assert_eq!(stats.coins, 100);

        stats.spend_coins(100).unwrap();
        assert_eq!(stats.coins, 0);
    }

    #[test]
    fn test_spend_gems() {
        let mut stats = PlayerStats::new("p");
        assert!(stats.spend_gems(11).is_err());
        assert_eq!(stats.gems, 10);
        stats.spend_gems(4).unwrap();
        assert_eq!(stats.gems, 6);
    }

    #[test]
    fn test_record_unlock_is_append_only_set() {
        let mut stats = PlayerStats::new("p");
        assert!(stats.record_unlock("first_task"));
        assert!(!stats.record_unlock("first_task"));
        assert_eq!(stats.achievements_unlocked, vec!["first_task".to_string()]);
    }

    #[test]
    fn test_roll_over_daily_and_weekly() {
        let mut stats = PlayerStats::new("p");
        // First call only stamps the dates
        assert!(!stats.roll_over(day(15)));
        stats.gain_xp(40);
        stats.daily_tasks_completed = 2;
        stats.weekly_tasks_completed = 2;

        // Same day: nothing resets
        assert!(!stats.roll_over(day(15)));
        assert_eq!(stats.daily_xp, 40);

        // Next day, same ISO week: daily only
        assert!(stats.roll_over(day(16)));
        assert_eq!(stats.daily_xp, 0);
        assert_eq!(stats.daily_tasks_completed, 0);
        assert_eq!(stats.weekly_xp, 40);
        assert_eq!(stats.weekly_tasks_completed, 2);

        // Monday of the next week: weekly resets too
        assert!(stats.roll_over(day(20)));
        assert_eq!(stats.weekly_xp, 0);
        assert_eq!(stats.weekly_tasks_completed, 0);
    }

    #[test]
    fn test_sanitize_recomputes_derived_fields() {
        let mut stats = PlayerStats::new("p");
        stats.total_xp = 260;
        stats.level = 7;
        stats.current_xp = 999;
        stats.xp_to_next_level = 1;
        stats.current_streak = 5;
        stats.longest_streak = 2;
        stats.achievements_unlocked = vec!["a".into(), "b".into(), "a".into()];

        assert!(stats.sanitize());
        assert_eq!(stats.level, 3);
        assert_eq!(stats.current_xp, 10);
        assert_eq!(stats.xp_to_next_level, 225);
        assert_eq!(stats.longest_streak, 5);
        assert_eq!(stats.achievements_unlocked, vec!["a".to_string(), "b".to_string()]);

        assert!(!stats.sanitize());
    }
}
