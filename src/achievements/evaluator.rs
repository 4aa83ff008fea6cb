//! Requirement checks and exactly-once unlock granting.

use super::data::AchievementCatalog;
use super::types::{AchievementDef, Requirement, RequirementKind, UnlockedAchievement};
use crate::stats::PlayerStats;
use tracing::info;

/// Whether `stats` currently satisfy a requirement.
///
/// `Comeback` depends on the login gap rather than stored stats and is only
/// checked by [`check_comeback`]; here it is never satisfied.
pub fn requirement_met(req: &Requirement, stats: &PlayerStats) -> bool {
    let value = req.value;
    match req.kind {
        RequirementKind::TasksCompleted => stats.tasks_completed >= value,
        RequirementKind::Streak => u64::from(stats.current_streak) >= value,
        RequirementKind::Level => u64::from(stats.level) >= value,
        RequirementKind::TotalXp => stats.total_xp >= value,
        RequirementKind::DailyXp => stats.daily_xp >= value,
        RequirementKind::DailyTasks => stats.daily_tasks_completed >= value,
        RequirementKind::Achievements => stats.achievements_unlocked.len() as u64 >= value,
        RequirementKind::QuestsCompleted => stats.quests_completed >= value,
        RequirementKind::DailyQuests => stats.daily_quests_completed >= value,
        RequirementKind::EpicTasks => stats.epic_tasks_completed >= value,
        RequirementKind::LegendaryTasks => stats.legendary_tasks_completed >= value,
        RequirementKind::HardTasks => stats.hard_tasks_completed >= value,
        RequirementKind::HighPriorityTasks => stats.high_priority_tasks_completed >= value,
        RequirementKind::EarlyCompletion => stats.early_completions >= value,
        RequirementKind::LateCompletion => stats.late_completions >= value,
        RequirementKind::PerfectDay => stats.perfect_days >= value,
        RequirementKind::WeekendTasks => stats.weekend_tasks >= value,
        RequirementKind::CategoryTasks => stats.max_category_tasks() >= value,
        RequirementKind::AllCategories => stats.all_categories_at_least(value),
        RequirementKind::PerfectTasks => stats.perfect_tasks_completed >= value,
        RequirementKind::Coins => stats.coins >= value,
        RequirementKind::StreakRecovered => stats.streak_recoveries >= value,
        RequirementKind::SubtasksCreated => stats.subtasks_created >= value,
        RequirementKind::AccountCreated => true,
        RequirementKind::Comeback => false,
        RequirementKind::Unknown => false,
    }
}

/// Grants an achievement if the player does not have it yet.
///
/// The id is recorded in the same step as the XP and coin rewards, so a
/// second call for the same id returns `None` and grants nothing.
pub fn unlock_achievement(
    stats: &mut PlayerStats,
    def: &AchievementDef,
) -> Option<UnlockedAchievement> {
    if !stats.record_unlock(&def.id) {
        return None;
    }

    let level_up = stats.add_reward_xp(def.xp_reward);
    stats.add_coins(def.coin_reward);
    stats.achievement_points = stats.achievement_points.saturating_add(def.xp_reward);

    info!(
        user = %stats.user_id,
        achievement = %def.id,
        xp = def.xp_reward,
        coins = def.coin_reward,
        "achievement unlocked"
    );

    Some(UnlockedAchievement {
        id: def.id.clone(),
        name: def.name.clone(),
        xp_reward: def.xp_reward,
        coin_reward: def.coin_reward,
        level_up,
    })
}

fn unlock_matching<F>(
    stats: &mut PlayerStats,
    catalog: &AchievementCatalog,
    mut filter: F,
) -> Vec<UnlockedAchievement>
where
    F: FnMut(&AchievementDef) -> bool,
{
    let mut unlocked = Vec::new();
    for def in catalog.iter() {
        if stats.has_achievement(&def.id) || !filter(def) {
            continue;
        }
        // Reported once by `AchievementCatalog::new`
        if def.requirement.kind == RequirementKind::Unknown {
            continue;
        }
        if requirement_met(&def.requirement, stats) {
            unlocked.extend(unlock_achievement(stats, def));
        }
    }
    unlocked
}

/// Checks only achievements whose requirement is one of `kinds`.
pub fn check_kinds(
    stats: &mut PlayerStats,
    catalog: &AchievementCatalog,
    kinds: &[RequirementKind],
) -> Vec<UnlockedAchievement> {
    unlock_matching(stats, catalog, |def| kinds.contains(&def.requirement.kind))
}

/// Full re-scan of the catalog.
///
/// Repeats until a pass unlocks nothing, so unlocks that feed other
/// requirements (achievement counts, level through achievement XP, coins)
/// cascade within one call. Running it again on unchanged stats is a no-op.
pub fn scan_all(stats: &mut PlayerStats, catalog: &AchievementCatalog) -> Vec<UnlockedAchievement> {
    let mut all = Vec::new();
    loop {
        let pass = unlock_matching(stats, catalog, |_| true);
        if pass.is_empty() {
            break;
        }
        all.extend(pass);
    }
    all
}

/// Unlocks comeback achievements whose threshold `days_away` reaches.
pub fn check_comeback(
    stats: &mut PlayerStats,
    catalog: &AchievementCatalog,
    days_away: i64,
) -> Vec<UnlockedAchievement> {
    let days_away = u64::try_from(days_away).unwrap_or(0);
    let mut unlocked = Vec::new();
    for def in catalog.iter() {
        if def.requirement.kind == RequirementKind::Comeback
            && days_away >= def.requirement.value
            && !stats.has_achievement(&def.id)
        {
            unlocked.extend(unlock_achievement(stats, def));
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::types::{AchievementCategory, AchievementRarity};
    use crate::stats::LevelUp;

    fn def(id: &str, kind: RequirementKind, value: u64, xp: u64) -> AchievementDef {
        AchievementDef {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            rarity: AchievementRarity::Common,
            category: AchievementCategory::Tasks,
            xp_reward: xp,
            coin_reward: 5,
            requirement: Requirement { kind, value },
            secret: false,
        }
    }

    #[test]
    fn test_requirement_thresholds() {
        let mut stats = PlayerStats::new("p");
        let req = Requirement {
            kind: RequirementKind::TasksCompleted,
            value: 3,
        };
        stats.tasks_completed = 2;
        assert!(!requirement_met(&req, &stats));
        stats.tasks_completed = 3;
        assert!(requirement_met(&req, &stats));

        let always = Requirement {
            kind: RequirementKind::AccountCreated,
            value: 1,
        };
        assert!(requirement_met(&always, &stats));

        let unknown = Requirement {
            kind: RequirementKind::Unknown,
            value: 0,
        };
        assert!(!requirement_met(&unknown, &stats));
    }

    #[test]
    fn test_unlock_is_exactly_once() {
        let mut stats = PlayerStats::new("p");
        let d = def("a", RequirementKind::TasksCompleted, 1, 40);

        let first = unlock_achievement(&mut stats, &d).unwrap();
        assert_eq!(first.xp_reward, 40);
        assert_eq!(stats.total_xp, 40);
        assert_eq!(stats.coins, 105);
        assert_eq!(stats.achievement_points, 40);

        assert!(unlock_achievement(&mut stats, &d).is_none());
        assert_eq!(stats.total_xp, 40);
        assert_eq!(stats.coins, 105);
        assert_eq!(stats.achievements_unlocked, vec!["a".to_string()]);
    }

    #[test]
    fn test_unlock_reports_level_up() {
        let mut stats = PlayerStats::new("p");
        stats.add_reward_xp(90);
        let d = def("big", RequirementKind::AccountCreated, 1, 20);
        let unlocked = unlock_achievement(&mut stats, &d).unwrap();
        assert_eq!(
            unlocked.level_up,
            Some(LevelUp {
                previous_level: 1,
                new_level: 2
            })
        );
    }

    #[test]
    fn test_scan_all_cascades_and_is_idempotent() {
        let catalog = AchievementCatalog::new(vec![
            def("welcome", RequirementKind::AccountCreated, 1, 10),
            def("two", RequirementKind::Achievements, 1, 10),
            def("three", RequirementKind::Achievements, 2, 10),
            def("lvl2", RequirementKind::Level, 2, 0),
            def("odd", RequirementKind::Unknown, 0, 1000),
        ])
        .unwrap();

        let mut stats = PlayerStats::new("p");
        stats.add_reward_xp(75);
        let unlocked = scan_all(&mut stats, &catalog);
        let ids: Vec<&str> = unlocked.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["welcome", "two", "three", "lvl2"]);
        assert_eq!(stats.total_xp, 105);
        assert!(!stats.has_achievement("odd"));

        let snapshot = stats.clone();
        assert!(scan_all(&mut stats, &catalog).is_empty());
        assert_eq!(stats, snapshot);
    }

    #[test]
    fn test_check_kinds_filters() {
        let catalog = AchievementCatalog::new(vec![
            def("streak", RequirementKind::Streak, 3, 0),
            def("tasks", RequirementKind::TasksCompleted, 1, 0),
        ])
        .unwrap();
        let mut stats = PlayerStats::new("p");
        stats.current_streak = 3;
        stats.tasks_completed = 1;

        let unlocked = check_kinds(&mut stats, &catalog, &[RequirementKind::Streak]);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "streak");
        assert!(!stats.has_achievement("tasks"));
    }

    #[test]
    fn test_comeback_threshold() {
        let catalog = AchievementCatalog::new(vec![def(
            "back",
            RequirementKind::Comeback,
            7,
            10,
        )])
        .unwrap();
        let mut stats = PlayerStats::new("p");
        assert!(check_comeback(&mut stats, &catalog, 6).is_empty());
        assert!(check_comeback(&mut stats, &catalog, -3).is_empty());
        assert_eq!(check_comeback(&mut stats, &catalog, 7).len(), 1);
        assert!(check_comeback(&mut stats, &catalog, 30).is_empty());
        // A full scan never unlocks comeback on its own
        let mut fresh = PlayerStats::new("q");
        assert!(scan_all(&mut fresh, &catalog).is_empty());
    }
}
