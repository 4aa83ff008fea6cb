//! Task data as seen by the reward engine.

use super::rewards::{calculate_task_rewards, TaskRewards};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Trivial,
    Easy,
    Medium,
    Hard,
    Epic,
    Legendary,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Trivial,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Epic,
        Difficulty::Legendary,
    ];

    /// Base XP for completing a task of this difficulty.
    pub fn base_xp(&self) -> u64 {
        match self {
            Difficulty::Trivial => 5,
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
            Difficulty::Epic => 100,
            Difficulty::Legendary => 200,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Trivial => "Trivial",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Epic => "Epic",
            Difficulty::Legendary => "Legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::None,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Flat XP added on top of the difficulty base.
    pub fn xp_bonus(&self) -> u64 {
        match self {
            Priority::None | Priority::Low => 0,
            Priority::Medium => 5,
            Priority::High => 10,
            Priority::Critical => 20,
        }
    }

    /// High and critical tasks count toward high-priority achievements.
    pub fn is_high(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub completed: bool,
}

/// A to-do item. Rewards are locked in at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub xp_reward: u64,
    pub coin_reward: u64,
}

impl Task {
    pub fn new(title: impl Into<String>, difficulty: Difficulty, priority: Priority) -> Self {
        let TaskRewards { xp, coins } = calculate_task_rewards(difficulty, priority);
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: None,
            difficulty,
            priority,
            status: TaskStatus::Pending,
            due_date: None,
            completed_at: None,
            subtasks: Vec::new(),
            xp_reward: xp,
            coin_reward: coins,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn add_subtask(&mut self, title: impl Into<String>) {
        self.subtasks.push(Subtask {
            title: title.into(),
            completed: false,
        });
    }

    /// Explicit edit of difficulty/priority. Recomputes the locked rewards.
    pub fn update_rewards(&mut self, difficulty: Difficulty, priority: Priority) {
        self.difficulty = difficulty;
        self.priority = priority;
        let rewards = calculate_task_rewards(difficulty, priority);
        self.xp_reward = rewards.xp;
        self.coin_reward = rewards.coins;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn subtasks_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_locks_rewards() {
        let task = Task::new("Write report", Difficulty::Medium, Priority::High);
        assert_eq!(task.xp_reward, 35);
        assert_eq!(task.coin_reward, 12);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_direct_field_edit_keeps_locked_rewards() {
        let mut task = Task::new("Refactor", Difficulty::Easy, Priority::None);
        task.difficulty = Difficulty::Legendary;
        assert_eq!(task.xp_reward, 10);
    }

    #[test]
    fn test_update_rewards_recomputes() {
        let mut task = Task::new("Refactor", Difficulty::Easy, Priority::None);
        task.update_rewards(Difficulty::Epic, Priority::Critical);
        assert_eq!(task.xp_reward, 120);
        assert_eq!(task.coin_reward, 50);
    }

    #[test]
    fn test_high_priority_flag() {
        assert!(Priority::High.is_high());
        assert!(Priority::Critical.is_high());
        assert!(!Priority::Medium.is_high());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Difficulty::Legendary).unwrap();
        assert_eq!(json, "\"legendary\"");
        let p: Priority = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(p, Priority::Critical);
    }
}
