//! Engine inputs and the result values handed back to the caller.

use crate::achievements::UnlockedAchievement;
use crate::core::leveling::level_title;
use crate::quests::{ClaimedQuest, QuestProgress, QuestRewards};
use crate::stats::{LevelUp, StreakUpdate};
use crate::tasks::{Difficulty, Priority, Task, XpGrant};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the engine needs to know about a finished task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: Uuid,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub priority: Priority,
    /// Locked at task creation.
    pub xp_reward: u64,
    pub coin_reward: u64,
    pub due_date: Option<NaiveDate>,
    pub subtask_count: usize,
    pub subtasks_done: usize,
    pub completed_at: NaiveDateTime,
    /// Open tasks still due today after this one, if the caller knows.
    /// `Some(0)` counts as a perfect day.
    pub open_tasks_due_today: Option<u32>,
}

impl TaskCompletion {
    pub fn from_task(
        task: &Task,
        completed_at: NaiveDateTime,
        open_tasks_due_today: Option<u32>,
    ) -> Self {
        Self {
            task_id: task.id,
            category: task.category.clone(),
            difficulty: task.difficulty,
            priority: task.priority,
            xp_reward: task.xp_reward,
            coin_reward: task.coin_reward,
            due_date: task.due_date,
            subtask_count: task.subtasks.len(),
            subtasks_done: task.subtasks_done(),
            completed_at,
            open_tasks_due_today,
        }
    }

    pub fn is_early(&self) -> bool {
        self.due_date
            .is_some_and(|due| self.completed_at.date() < due)
    }

    pub fn is_late(&self) -> bool {
        self.due_date
            .is_some_and(|due| self.completed_at.date() > due)
    }

    /// At least one subtask, all done, and not late.
    pub fn is_perfect(&self) -> bool {
        self.subtask_count > 0 && self.subtasks_done >= self.subtask_count && !self.is_late()
    }
}

/// Domain events routed through [`RewardEngine::apply_event`].
///
/// [`RewardEngine::apply_event`]: super::RewardEngine::apply_event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TaskCreated,
    SubtaskCreated,
    TaskFailed,
    TaskCompleted(TaskCompletion),
    Login,
}

/// Short reference to a quest that finished during an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedQuest {
    pub quest_id: Uuid,
    pub title: String,
}

/// What one event changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub streak: Option<StreakUpdate>,
    /// Task XP including the streak bonus.
    pub xp: Option<XpGrant>,
    pub coins_gained: u64,
    /// Net level change over the whole event, achievement XP included.
    pub level_up: Option<LevelUp>,
    pub unlocked: Vec<UnlockedAchievement>,
    pub quest_progress: Vec<QuestProgress>,
    pub completed_quests: Vec<CompletedQuest>,
}

impl EventOutcome {
    pub fn is_empty(&self) -> bool {
        *self == EventOutcome::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        let mut out = Vec::new();
        if let Some(streak) = self.streak.filter(|s| s.lost) {
            out.push(Notification::StreakLost {
                previous: streak.previous,
            });
        }
        if let Some(xp) = self.xp {
            out.push(Notification::RewardGained {
                xp: xp.total,
                bonus_xp: xp.bonus,
                coins: self.coins_gained,
                gems: 0,
            });
        }
        if let Some(level_up) = self.level_up {
            out.push(Notification::level_up(level_up.new_level));
        }
        out.extend(self.unlocked.iter().map(Notification::from));
        out.extend(
            self.completed_quests
                .iter()
                .map(|q| Notification::QuestCompleted {
                    quest_id: q.quest_id,
                    title: q.title.clone(),
                }),
        );
        out
    }
}

/// Result of a claim. A no-op claim has zero rewards and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub claimed: Option<ClaimedQuest>,
    pub rewards: QuestRewards,
    pub level_up: Option<LevelUp>,
    pub unlocked: Vec<UnlockedAchievement>,
}

impl ClaimOutcome {
    pub fn is_noop(&self) -> bool {
        self.claimed.is_none()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        let mut out = Vec::new();
        if let Some(claimed) = &self.claimed {
            out.push(Notification::QuestClaimed {
                quest_id: claimed.quest_id,
                title: claimed.title.clone(),
            });
            out.push(Notification::RewardGained {
                xp: self.rewards.xp,
                bonus_xp: 0,
                coins: self.rewards.coins,
                gems: self.rewards.gems,
            });
        }
        if let Some(level_up) = self.level_up {
            out.push(Notification::level_up(level_up.new_level));
        }
        out.extend(self.unlocked.iter().map(Notification::from));
        out
    }
}

/// Things worth showing the player. Rendering is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    LevelUp {
        new_level: u32,
        /// Rank title for `new_level`.
        title: String,
    },
    RewardGained {
        xp: u64,
        bonus_xp: u64,
        coins: u64,
        gems: u64,
    },
    AchievementUnlocked {
        id: String,
        name: String,
        xp: u64,
        coins: u64,
    },
    QuestCompleted {
        quest_id: Uuid,
        title: String,
    },
    QuestClaimed {
        quest_id: Uuid,
        title: String,
    },
    StreakLost {
        previous: u32,
    },
}

impl Notification {
    pub fn level_up(new_level: u32) -> Self {
        Notification::LevelUp {
            new_level,
            title: level_title(new_level).to_string(),
        }
    }
}

impl From<&UnlockedAchievement> for Notification {
    fn from(unlocked: &UnlockedAchievement) -> Self {
        Notification::AchievementUnlocked {
            id: unlocked.id.clone(),
            name: unlocked.name.clone(),
            xp: unlocked.xp_reward,
            coins: unlocked.coin_reward,
        }
    }
}
