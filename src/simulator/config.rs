//! Simulation configuration.

use chrono::NaiveDate;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated players
    pub num_runs: u32,

    /// Days each player plays
    pub days: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Chance (0.0 - 1.0) that a player does nothing on a given day
    pub skip_chance: f64,

    /// Tasks completed on an active day, inclusive range
    pub min_tasks_per_day: u32,
    pub max_tasks_per_day: u32,

    /// First simulated day
    pub start_date: NaiveDate,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            days: 90,
            seed: None,
            skip_chance: 0.15,
            min_tasks_per_day: 1,
            max_tasks_per_day: 6,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// A month of play for a handful of players.
    pub fn quick() -> Self {
        Self {
            num_runs: 20,
            days: 30,
            ..Default::default()
        }
    }

    /// A year of play; slow but shows late levels.
    pub fn long_term() -> Self {
        Self {
            num_runs: 25,
            days: 365,
            ..Default::default()
        }
    }

    /// Clamped copy: skip chance in range, min tasks not above max.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        config.skip_chance = config.skip_chance.clamp(0.0, 1.0);
        if config.min_tasks_per_day > config.max_tasks_per_day {
            config.max_tasks_per_day = config.min_tasks_per_day;
        }
        config
    }
}
