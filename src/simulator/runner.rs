//! Simulation runner driving the real [`GameService`].
//!
//! Every simulated player gets its own in-memory store and a manually
//! advanced clock, so runs are independent and a seeded run is repeatable.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::config::CatalogConfig;
use crate::core::clock::{Clock, FixedClock};
use crate::core::constants::DEFAULT_CATEGORIES;
use crate::engine::GameService;
use crate::error::EngineError;
use crate::quests::claimable_quests;
use crate::store::MemoryStore;
use crate::tasks::{Difficulty, Priority, Task};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use uuid::Uuid;

type SimService = GameService<MemoryStore, FixedClock>;

const SIM_USER: &str = "sim-player";

/// Most tasks are everyday chores; legendary ones are rare.
const DIFFICULTY_WEIGHTS: [(Difficulty, u32); 6] = [
    (Difficulty::Trivial, 10),
    (Difficulty::Easy, 30),
    (Difficulty::Medium, 30),
    (Difficulty::Hard, 18),
    (Difficulty::Epic, 9),
    (Difficulty::Legendary, 3),
];

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, EngineError> {
    let config = config.normalized();
    let catalogs = CatalogConfig::default();
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_player(&config, catalogs.clone(), &mut rng)?;

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level {}, XP {}, Coins {}, Longest Streak {}, Achievements {}, Quests {}",
                run_idx + 1,
                config.num_runs,
                run.final_level,
                run.total_xp,
                run.coins,
                run.longest_streak,
                run.achievements,
                run.quests_claimed
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs, config.days))
}

/// Plays one player through `config.days` days.
///
/// Each day the player logs in, then either skips the day or completes a
/// random number of random tasks an hour apart and claims whatever quests
/// finished.
pub fn simulate_player<R: Rng>(
    config: &SimConfig,
    catalogs: CatalogConfig,
    rng: &mut R,
) -> Result<RunStats, EngineError> {
    let service = GameService::with_seed(
        MemoryStore::new(),
        FixedClock::at_date(config.start_date),
        catalogs,
        rng.gen(),
    );
    let mut run = RunStats::default();

    for day in 0..config.days {
        let date = config.start_date + Duration::days(i64::from(day));
        service
            .clock()
            .set(date.and_hms_opt(8, 0, 0).unwrap_or_default());
        service.record_login(SIM_USER)?;

        if rng.gen_bool(config.skip_chance) {
            run.days_skipped += 1;
            continue;
        }

        let count = rng.gen_range(config.min_tasks_per_day..=config.max_tasks_per_day);
        for done in 1..=count {
            service.clock().advance(Duration::hours(1));
            let mut task = random_task(rng, date);
            service.create_task(SIM_USER, &task)?;
            for _ in 0..task.subtasks.len() {
                service.record_subtask_created(SIM_USER)?;
            }

            let outcome = service.complete_task(SIM_USER, &mut task, Some(count - done))?;
            if outcome.streak.is_some_and(|s| s.lost) {
                run.streaks_lost += 1;
            }
            run.tasks_completed += 1;
        }

        run.quests_claimed += claim_finished_quests(&service)?;
        debug!(day, tasks = count, "simulated day");
    }

    let stats = service.load_player(SIM_USER)?.state.stats;
    run.final_level = stats.level;
    run.total_xp = stats.total_xp;
    run.coins = stats.coins;
    run.gems = stats.gems;
    run.longest_streak = stats.longest_streak;
    run.achievements = stats.achievements_unlocked.len() as u32;
    Ok(run)
}

fn claim_finished_quests(service: &SimService) -> Result<u32, EngineError> {
    let now = service.clock().now();
    let player = service.load_player(SIM_USER)?;
    let ids: Vec<Uuid> = claimable_quests(&player.state.quests, now)
        .iter()
        .map(|q| q.id)
        .collect();

    let mut claimed = 0;
    for id in ids {
        if !service.claim_quest(SIM_USER, id)?.is_noop() {
            claimed += 1;
        }
    }
    Ok(claimed)
}

fn random_task<R: Rng>(rng: &mut R, today: NaiveDate) -> Task {
    let difficulty = DIFFICULTY_WEIGHTS
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(d, _)| *d)
        .unwrap_or(Difficulty::Medium);
    let priority = Priority::ALL.choose(rng).copied().unwrap_or_default();
    let category = DEFAULT_CATEGORIES.choose(rng).copied().unwrap_or("Personal");

    let mut task = Task::new(format!("{} task", difficulty.name()), difficulty, priority)
        .with_category(category);

    match rng.gen_range(0..10) {
        0..=4 => task = task.with_due_date(today),
        5 | 6 => task = task.with_due_date(today + Duration::days(1)),
        7 => task = task.with_due_date(today - Duration::days(1)),
        _ => {}
    }

    if rng.gen_bool(0.25) {
        for i in 0..rng.gen_range(1..=3) {
            task.add_subtask(format!("Step {}", i + 1));
        }
        let all_done = rng.gen_bool(0.8);
        for subtask in &mut task.subtasks {
            subtask.completed = all_done;
        }
    }

    task
}
