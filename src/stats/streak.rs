//! Daily completion streak bookkeeping.

use super::types::PlayerStats;
use crate::utils::dates::days_between;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of registering a completion day against the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub previous: u32,
    pub current: u32,
    /// A gap of more than one day broke a running streak.
    pub lost: bool,
    /// A streak started after a loss just continued into its second day.
    pub recovered: bool,
}

impl StreakUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Registers a task completion on `today`.
///
/// Same-day repeats leave the streak untouched, a completion on the next day
/// extends it, and any longer gap restarts it at 1. A day earlier than the last
/// recorded completion (clock moved backwards) is treated like a same-day repeat.
pub fn register_completion(stats: &mut PlayerStats, today: NaiveDate) -> StreakUpdate {
    let previous = stats.current_streak;
    let mut lost = false;
    let mut recovered = false;

    let current = match stats.last_completed_date {
        None => 1,
        Some(last) => match days_between(last, today) {
            gap if gap <= 0 => previous.max(1),
            1 => {
                let next = previous.saturating_add(1);
                if stats.streak_recovery_pending && next >= 2 {
                    stats.streak_recovery_pending = false;
                    stats.streak_recoveries += 1;
                    recovered = true;
                }
                next
            }
            _ => {
                if previous > 0 {
                    lost = true;
                    stats.streak_recovery_pending = true;
                }
                1
            }
        },
    };

    stats.current_streak = current;
    stats.longest_streak = stats.longest_streak.max(current);
    if stats.last_completed_date.map_or(true, |last| today > last) {
        stats.last_completed_date = Some(today);
    }

    StreakUpdate {
        previous,
        current,
        lost,
        recovered,
    }
}
