//! Integration test: achievement unlocks
//!
//! Unlocks must happen exactly once per player no matter how often the
//! catalog is re-scanned, cascades must settle in a single scan, and
//! catalogs loaded from JSON must tolerate requirement types this engine
//! does not know.

use chrono::{NaiveDate, NaiveDateTime};
use questify::achievements::{
    scan_all, AchievementCatalog, AchievementCategory, RequirementKind,
};
use questify::quests::QuestCatalog;
use questify::{
    CatalogConfig, CatalogError, Difficulty, EngineError, GameEvent, PlayerState, PlayerStats,
    Priority, RewardEngine, Task, TaskCompletion,
};
use std::sync::Arc;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn builtin_engine() -> RewardEngine {
    RewardEngine::default()
}

fn engine_from(json: &str) -> RewardEngine {
    RewardEngine::new(CatalogConfig {
        achievements: Arc::new(AchievementCatalog::from_json(json).unwrap()),
        quests: Arc::new(QuestCatalog::from_json("[]").unwrap()),
    })
}

fn complete(engine: &RewardEngine, state: &mut PlayerState, now: NaiveDateTime) -> Vec<String> {
    let task = Task::new("Task", Difficulty::Easy, Priority::None);
    let event = GameEvent::TaskCompleted(TaskCompletion::from_task(&task, now, None));
    engine
        .apply_event(state, &event, now)
        .unlocked
        .into_iter()
        .map(|u| u.id)
        .collect()
}

fn assert_no_duplicates(stats: &PlayerStats) {
    let mut ids = stats.achievements_unlocked.clone();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), stats.achievements_unlocked.len());
}

// =============================================================================
// Built-in catalog
// =============================================================================

#[test]
fn test_new_player_gets_only_welcome() {
    let engine = builtin_engine();
    let mut state = PlayerState::new("newbie");

    let unlocked = engine.rescan(&mut state);
    let ids: Vec<&str> = unlocked.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["welcome"]);
    assert!(engine.rescan(&mut state).is_empty());
}

#[test]
fn test_task_milestones_unlock_exactly_once() {
    let engine = builtin_engine();
    let mut state = PlayerState::new("grinder");
    let mut seen = Vec::new();

    for hour in 0..12 {
        seen.extend(complete(&engine, &mut state, at(15, hour)));
    }

    assert_eq!(seen.iter().filter(|id| *id == "first_task").count(), 1);
    assert_eq!(seen.iter().filter(|id| *id == "tasks_10").count(), 1);
    assert!(state.stats.has_achievement("daily_tasks_10"));
    assert_no_duplicates(&state.stats);
}

#[test]
fn test_rescan_is_idempotent() {
    let engine = builtin_engine();
    let mut state = PlayerState::new("steady");
    for day in 10..=16 {
        complete(&engine, &mut state, at(day, 9));
    }
    assert!(state.stats.has_achievement("streak_7"));

    let snapshot = state.stats.clone();
    assert!(engine.rescan(&mut state).is_empty());
    assert!(engine.rescan(&mut state).is_empty());
    assert_eq!(state.stats, snapshot);
}

#[test]
fn test_comeback_on_login_after_a_week_away() {
    let engine = builtin_engine();
    let mut state = PlayerState::new("wanderer");
    engine.apply_event(&mut state, &GameEvent::Login, at(1, 9));
    assert!(!state.stats.has_achievement("comeback_7"));

    let outcome = engine.apply_event(&mut state, &GameEvent::Login, at(9, 9));
    assert!(outcome.unlocked.iter().any(|u| u.id == "comeback_7"));

    let outcome = engine.apply_event(&mut state, &GameEvent::Login, at(20, 9));
    assert!(outcome.unlocked.iter().all(|u| u.id != "comeback_7"));
}

#[test]
fn test_category_counts() {
    let catalog = AchievementCatalog::builtin();
    let mut stats = PlayerStats::new("counter");
    scan_all(&mut stats, catalog);

    let (unlocked, total) = catalog.count_by_category(&stats, AchievementCategory::Streaks);
    assert_eq!(unlocked, 0);
    assert!(total >= 4);
    assert!(catalog.unlock_percentage(&stats) > 0.0);
}

// =============================================================================
// Custom catalogs
// =============================================================================

#[test]
fn test_cascade_settles_in_one_scan() {
    let engine = engine_from(
        r#"[
            {"id":"one","name":"One","description":"","category":"tasks",
             "xp_reward":10,"requirement":{"type":"tasks_completed","value":1}},
            {"id":"pair","name":"Pair","description":"","category":"special",
             "xp_reward":10,"requirement":{"type":"achievements","value":1}},
            {"id":"trio","name":"Trio","description":"","category":"special",
             "xp_reward":10,"requirement":{"type":"achievements","value":2}}
        ]"#,
    );
    let mut state = PlayerState::new("chain");

    let ids = complete(&engine, &mut state, at(15, 9));
    assert_eq!(ids, vec!["one", "pair", "trio"]);
    assert_eq!(state.stats.achievement_points, 30);
}

#[test]
fn test_streak_recovery_unlock() {
    let engine = engine_from(
        r#"[{"id":"back","name":"Back","description":"","category":"streaks",
             "requirement":{"type":"streak_recovered","value":1}}]"#,
    );
    let mut state = PlayerState::new("phoenix");

    complete(&engine, &mut state, at(1, 9));
    complete(&engine, &mut state, at(2, 9));
    // Gap breaks the streak
    assert!(complete(&engine, &mut state, at(6, 9)).is_empty());
    assert_eq!(complete(&engine, &mut state, at(7, 9)), vec!["back"]);
    assert_eq!(state.stats.streak_recoveries, 1);
}

#[test]
fn test_unknown_requirement_loads_but_never_unlocks() {
    let json = r#"[{"id":"mystery","name":"Mystery","description":"","category":"special",
                    "xp_reward":50,"requirement":{"type":"moon_phase","value":1}}]"#;
    let catalog = AchievementCatalog::from_json(json).unwrap();
    assert_eq!(
        catalog.get("mystery").unwrap().requirement.kind,
        RequirementKind::Unknown
    );

    let engine = engine_from(json);
    let mut state = PlayerState::new("curious");
    for hour in 0..5 {
        assert!(complete(&engine, &mut state, at(15, hour)).is_empty());
    }

    // Manual grant still works, once
    assert_eq!(engine.unlock_achievement(&mut state, "mystery").unwrap().len(), 1);
    assert!(engine.unlock_achievement(&mut state, "mystery").unwrap().is_empty());
    assert!(matches!(
        engine.unlock_achievement(&mut state, "missing"),
        Err(EngineError::UnknownAchievement(_))
    ));
}

#[test]
fn test_duplicate_ids_rejected() {
    let json = r#"[
        {"id":"x","name":"X","description":"","category":"tasks",
         "requirement":{"type":"tasks_completed","value":1}},
        {"id":"x","name":"X again","description":"","category":"tasks",
         "requirement":{"type":"tasks_completed","value":2}}
    ]"#;
    assert!(matches!(
        AchievementCatalog::from_json(json),
        Err(CatalogError::DuplicateId(id)) if id == "x"
    ));
}
