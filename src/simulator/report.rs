//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// Final numbers for one simulated player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub final_level: u32,
    pub total_xp: u64,
    pub coins: u64,
    pub gems: u64,
    pub longest_streak: u32,
    pub achievements: u32,
    pub quests_claimed: u32,
    pub tasks_completed: u32,
    pub days_skipped: u32,
    pub streaks_lost: u32,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub days: u32,

    pub avg_final_level: f64,
    pub avg_total_xp: f64,
    pub avg_coins: f64,
    pub avg_gems: f64,
    pub avg_longest_streak: f64,
    pub avg_achievements: f64,
    pub avg_quests_claimed: f64,
    pub avg_tasks_completed: f64,
    pub avg_streaks_lost: f64,

    pub level_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average<F: Fn(&RunStats) -> f64>(runs: &[RunStats], field: F) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(field).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, days: u32) -> Self {
        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        Self {
            num_runs: runs.len() as u32,
            days,
            avg_final_level: average(&runs, |r| f64::from(r.final_level)),
            avg_total_xp: average(&runs, |r| r.total_xp as f64),
            avg_coins: average(&runs, |r| r.coins as f64),
            avg_gems: average(&runs, |r| r.gems as f64),
            avg_longest_streak: average(&runs, |r| f64::from(r.longest_streak)),
            avg_achievements: average(&runs, |r| f64::from(r.achievements)),
            avg_quests_claimed: average(&runs, |r| f64::from(r.quests_claimed)),
            avg_tasks_completed: average(&runs, |r| f64::from(r.tasks_completed)),
            avg_streaks_lost: average(&runs, |r| f64::from(r.streaks_lost)),
            level_distribution,
            run_stats: runs,
        }
    }

    /// XP earned per simulated day, averaged over runs.
    pub fn xp_per_day(&self) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        self.avg_total_xp / f64::from(self.days)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Players: {}, {} days each\n\n",
            self.num_runs, self.days
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Total XP:        {:.0}\n", self.avg_total_xp));
        report.push_str(&format!("  Avg XP per Day:      {:.1}\n", self.xp_per_day()));
        report.push_str(&format!(
            "  Avg Tasks Completed: {:.1}\n\n",
            self.avg_tasks_completed
        ));

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Coins:           {:.0}\n", self.avg_coins));
        report.push_str(&format!("  Avg Gems:            {:.1}\n\n", self.avg_gems));

        report.push_str("── ENGAGEMENT ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Longest Streak:  {:.1}\n",
            self.avg_longest_streak
        ));
        report.push_str(&format!("  Avg Streaks Lost:    {:.1}\n", self.avg_streaks_lost));
        report.push_str(&format!("  Avg Achievements:    {:.1}\n", self.avg_achievements));
        report.push_str(&format!(
            "  Avg Quests Claimed:  {:.1}\n\n",
            self.avg_quests_claimed
        ));

        report.push_str("── LEVEL DISTRIBUTION ───────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:3}: {:>5.1}% {}\n", level, pct, bar));
        }

        if self.avg_achievements > 0.0 && self.avg_quests_claimed == 0.0 && self.days >= 7 {
            report.push_str("  ⚠️  No quests claimed in a week or more - targets too high?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(level: u32, xp: u64) -> RunStats {
        RunStats {
            final_level: level,
            total_xp: xp,
            coins: 100,
            longest_streak: 4,
            achievements: 6,
            quests_claimed: 3,
            tasks_completed: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_report_generation() {
        let report = SimReport::from_runs(vec![run(4, 900), run(6, 1500)], 10);
        assert_eq!(report.num_runs, 2);
        assert!((report.avg_final_level - 5.0).abs() < 1e-9);
        assert!((report.avg_total_xp - 1200.0).abs() < 1e-9);
        assert!((report.xp_per_day() - 120.0).abs() < 1e-9);
        assert_eq!(report.level_distribution.get(&4), Some(&1));

        let text = report.to_text();
        assert!(text.contains("SIMULATION REPORT"));
        assert!(text.contains("Avg Final Level"));
    }

    #[test]
    fn test_json_omits_individual_runs() {
        let report = SimReport::from_runs(vec![run(2, 200)], 5);
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(value["num_runs"], 1);
        assert!(value.get("run_stats").is_none());
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_runs(Vec::new(), 0);
        assert_eq!(report.avg_final_level, 0.0);
        assert_eq!(report.xp_per_day(), 0.0);
    }
}
