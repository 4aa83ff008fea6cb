//! Integration test: quest generation, progress, claiming and expiry
//!
//! Drives quests through the engine the way a client would: generate on
//! load, progress through task completions, claim once, and lose anything
//! left unclaimed when the window closes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use questify::achievements::AchievementCatalog;
use questify::quests::{
    apply_quest_event, claimable_quests, generate_quests, instantiate, Quest, QuestCatalog,
    QuestEvent, QuestType,
};
use questify::{
    CatalogConfig, Difficulty, GameEvent, PlayerState, Priority, RewardEngine, Task,
    TaskCompletion,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

const QUESTS: &str = r#"[
    {"id":"d_three","type":"daily","title":"Three Tasks","description":"",
     "objectives":[{"description":"Complete 3 tasks","type":"complete_tasks","target":3}],
     "rewards":{"xp":50,"coins":20}},
    {"id":"d_work","type":"daily","title":"Work","description":"",
     "objectives":[{"description":"Complete 2 Work tasks","type":"complete_category","category":"Work","target":2}],
     "rewards":{"xp":40,"coins":15}},
    {"id":"d_focus","type":"daily","title":"Focus","description":"",
     "objectives":[{"description":"Focus for 30 minutes","type":"focus_minutes","target":30}],
     "rewards":{"xp":40,"coins":15}},
    {"id":"w_xp","type":"weekly","title":"Weekly XP","description":"",
     "objectives":[{"description":"Earn 500 XP","type":"earn_xp","target":500}],
     "rewards":{"xp":200,"coins":100,"gems":5}},
    {"id":"s_sprint","type":"special","title":"Sprint","description":"",
     "objectives":[{"description":"Complete 10 tasks","type":"complete_tasks","target":10}],
     "rewards":{"xp":500,"coins":250,"gems":15}}
]"#;

/// 2024-05-15 is a Wednesday.
fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn engine() -> RewardEngine {
    RewardEngine::new(CatalogConfig {
        achievements: Arc::new(AchievementCatalog::new(Vec::new()).unwrap()),
        quests: Arc::new(QuestCatalog::from_json(QUESTS).unwrap()),
    })
}

fn fresh_state(engine: &RewardEngine, now: NaiveDateTime) -> PlayerState {
    let mut state = PlayerState::new("quester");
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    engine.refresh_quests(&mut state, now, &mut rng);
    state
}

fn complete_task(
    engine: &RewardEngine,
    state: &mut PlayerState,
    category: &str,
    now: NaiveDateTime,
) {
    let task = Task::new("Task", Difficulty::Easy, Priority::None).with_category(category);
    let event = GameEvent::TaskCompleted(TaskCompletion::from_task(&task, now, None));
    engine.apply_event(state, &event, now);
}

fn by_template<'a>(state: &'a PlayerState, template_id: &str) -> &'a Quest {
    state
        .quests
        .iter()
        .find(|q| q.template_id == template_id)
        .unwrap()
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_generation_is_idempotent_within_a_day() {
    let quests = QuestCatalog::from_json(QUESTS).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut list = Vec::new();

    let first = generate_quests(&mut list, "quester", &quests, at(15, 8), &mut rng);
    let ids: HashSet<Uuid> = list.iter().map(|q| q.id).collect();
    assert_eq!(first.created.len(), 4);

    let second = generate_quests(&mut list, "quester", &quests, at(15, 20), &mut rng);
    assert!(second.is_empty());
    let again: HashSet<Uuid> = list.iter().map(|q| q.id).collect();
    assert_eq!(ids, again);
}

#[test]
fn test_new_day_replaces_dailies_but_keeps_weekly() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    let weekly_id = by_template(&state, "w_xp").id;

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let report = engine.refresh_quests(&mut state, at(16, 8), &mut rng);

    assert_eq!(report.removed.len(), 3);
    assert_eq!(report.created.len(), 3);
    assert_eq!(by_template(&state, "w_xp").id, weekly_id);
    assert!(state
        .quests
        .iter()
        .filter(|q| q.quest_type == QuestType::Daily)
        .all(|q| q.start_date.date() == at(16, 0).date()));
}

#[test]
fn test_new_iso_week_generates_new_weekly() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    let weekly_id = by_template(&state, "w_xp").id;

    // Monday 2024-05-20
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    engine.refresh_quests(&mut state, at(20, 8), &mut rng);

    let weekly = by_template(&state, "w_xp");
    assert_ne!(weekly.id, weekly_id);
    assert_eq!(weekly.start_date.date(), at(20, 0).date());
}

// =============================================================================
// Progress
// =============================================================================

#[test]
fn test_third_task_completes_daily_quest() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    {
        let quest = state
            .quests
            .iter_mut()
            .find(|q| q.template_id == "d_three")
            .unwrap();
        quest.objectives[0].current = 2;
    }

    let task = Task::new("Third", Difficulty::Easy, Priority::None);
    let event = GameEvent::TaskCompleted(TaskCompletion::from_task(&task, at(15, 10), None));
    let outcome = engine.apply_event(&mut state, &event, at(15, 10));

    let quest = by_template(&state, "d_three");
    assert_eq!(quest.objectives[0].current, 3);
    assert!(quest.objectives[0].is_completed());
    assert!(quest.is_completed());
    assert!(!quest.claimed);
    assert_eq!(quest.completed_at, Some(at(15, 10)));
    assert_eq!(outcome.completed_quests.len(), 1);
}

#[test]
fn test_category_objective_ignores_other_categories() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));

    complete_task(&engine, &mut state, "Health", at(15, 9));
    complete_task(&engine, &mut state, "Work", at(15, 10));
    assert_eq!(by_template(&state, "d_work").objectives[0].current, 1);

    complete_task(&engine, &mut state, "Work", at(15, 11));
    complete_task(&engine, &mut state, "Work", at(15, 12));
    // Clamped at target
    assert_eq!(by_template(&state, "d_work").objectives[0].current, 2);
}

#[test]
fn test_unknown_objective_never_progresses() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    for hour in 9..15 {
        complete_task(&engine, &mut state, "Work", at(15, hour));
    }
    let focus = by_template(&state, "d_focus");
    assert_eq!(focus.objectives[0].current, 0);
    assert!(!focus.is_completed());
}

#[test]
fn test_quest_events_apply_directly() {
    let catalog = QuestCatalog::from_json(QUESTS).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let weekly = instantiate(catalog.get("w_xp").unwrap(), "quester", at(15, 8), &mut rng);
    let mut quests = vec![weekly];

    let progress =
        apply_quest_event(&mut quests, &QuestEvent::XpGained { amount: 600 }, at(15, 9));
    assert_eq!(progress.len(), 1);
    assert!(progress[0].quest_completed);
    assert_eq!(quests[0].objectives[0].current, 500);
}

// =============================================================================
// Claiming and expiry
// =============================================================================

#[test]
fn test_claim_grants_rewards_exactly_once() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    for hour in 9..12 {
        complete_task(&engine, &mut state, "Home", at(15, hour));
    }
    let quest_id = by_template(&state, "d_three").id;
    assert_eq!(claimable_quests(&state.quests, at(15, 12)).len(), 1);

    let coins_before = state.stats.coins;
    let xp_before = state.stats.total_xp;
    let outcome = engine.claim_quest(&mut state, quest_id, at(15, 12));
    assert!(!outcome.is_noop());
    assert_eq!(outcome.rewards.xp, 50);
    assert_eq!(state.stats.coins, coins_before + 20);
    assert_eq!(state.stats.total_xp, xp_before + 50);
    assert_eq!(state.stats.quests_completed, 1);
    assert_eq!(state.stats.daily_quests_completed, 1);

    let again = engine.claim_quest(&mut state, quest_id, at(15, 13));
    assert!(again.is_noop());
    assert!(again.rewards.is_zero());
    assert_eq!(state.stats.coins, coins_before + 20);
    assert_eq!(state.stats.quests_completed, 1);
}

#[test]
fn test_incomplete_and_unknown_quests_cannot_be_claimed() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    let quest_id = by_template(&state, "d_three").id;

    assert!(engine.claim_quest(&mut state, quest_id, at(15, 9)).is_noop());
    assert!(engine.claim_quest(&mut state, Uuid::new_v4(), at(15, 9)).is_noop());
    assert_eq!(state.stats.quests_completed, 0);
}

#[test]
fn test_expired_completed_quest_is_forfeited() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    for hour in 9..12 {
        complete_task(&engine, &mut state, "Home", at(15, hour));
    }
    let quest_id = by_template(&state, "d_three").id;
    let coins_before = state.stats.coins;

    // Past the end of the day the claim is refused
    let late = at(15, 23) + Duration::hours(2);
    assert!(engine.claim_quest(&mut state, quest_id, late).is_noop());

    // And the next refresh drops it
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let report = engine.refresh_quests(&mut state, at(16, 8), &mut rng);
    assert!(report.removed.iter().any(|q| q.id == quest_id));
    assert!(state.quest(quest_id).is_none());
    assert_eq!(state.stats.coins, coins_before);
}

#[test]
fn test_special_quest_activation() {
    let engine = engine();
    let mut state = fresh_state(&engine, at(15, 8));
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let quest = engine
        .activate_special_quest(&mut state, "s_sprint", at(15, 9), &mut rng)
        .unwrap();
    assert_eq!(quest.quest_type, QuestType::Special);
    assert_eq!(quest.end_date.date(), at(15, 0).date() + Duration::days(30));

    // No duplicate while the first is running
    assert!(engine
        .activate_special_quest(&mut state, "s_sprint", at(16, 9), &mut rng)
        .is_none());
    // Recurring and unknown templates are refused
    assert!(engine
        .activate_special_quest(&mut state, "d_three", at(16, 9), &mut rng)
        .is_none());
    assert!(engine
        .activate_special_quest(&mut state, "nope", at(16, 9), &mut rng)
        .is_none());
}
