//! Level curve: total XP <-> level, XP into the level, XP needed for the next.

use super::constants::{LEVEL_TITLES, XP_LEVEL_MULTIPLIER, XP_PER_LEVEL_BASE};
use serde::{Deserialize, Serialize};

/// Level position derived from a total XP amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    /// XP earned inside the current level.
    pub current_xp: u64,
    /// XP the current level takes to complete.
    pub xp_to_next_level: u64,
}

/// XP needed to clear `level` (level 1 needs 100, level 2 needs 150, ...).
///
/// Saturates at `u64::MAX` once the curve leaves the integer range.
pub fn xp_for_level(level: u32) -> u64 {
    let exponent = level.max(1) - 1;
    let xp = XP_PER_LEVEL_BASE as f64 * XP_LEVEL_MULTIPLIER.powi(exponent as i32);
    // `as` saturates on overflow and maps inf to u64::MAX
    xp.floor() as u64
}

/// Walks the curve from level 1 until the next full level would exceed `total_xp`.
///
/// Accumulation is checked, so huge totals stop at the level whose threshold no
/// longer fits in a u64 instead of looping forever.
pub fn level_from_total_xp(total_xp: u64) -> LevelInfo {
    let mut level = 1;
    let mut accumulated: u64 = 0;
    let mut needed = xp_for_level(level);

    while let Some(next_threshold) = accumulated.checked_add(needed) {
        if next_threshold > total_xp {
            break;
        }
        accumulated = next_threshold;
        level += 1;
        needed = xp_for_level(level);
    }

    LevelInfo {
        level,
        current_xp: total_xp - accumulated,
        xp_to_next_level: needed,
    }
}

/// Total XP required to arrive at the start of `level`.
pub fn total_xp_for_level(level: u32) -> u64 {
    (1..level.max(1)).fold(0u64, |acc, l| acc.saturating_add(xp_for_level(l)))
}

/// Progress through the current level as a fraction in [0, 1).
pub fn level_progress(info: &LevelInfo) -> f64 {
    if info.xp_to_next_level == 0 {
        return 0.0;
    }
    info.current_xp as f64 / info.xp_to_next_level as f64
}

/// Rank title shown next to the level. Anything below 5 is a Novice.
pub fn level_title(level: u32) -> &'static str {
    LEVEL_TITLES
        .iter()
        .rev()
        .find(|(min_level, _)| level >= *min_level)
        .map_or(LEVEL_TITLES[0].1, |&(_, title)| title)
}
