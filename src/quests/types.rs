//! Quest templates and quest instances.

use crate::tasks::Priority;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Daily,
    Weekly,
    Special,
    Story,
}

impl QuestType {
    pub fn name(&self) -> &'static str {
        match self {
            QuestType::Daily => "Daily",
            QuestType::Weekly => "Weekly",
            QuestType::Special => "Special",
            QuestType::Story => "Story",
        }
    }

    /// Daily and weekly quests are generated automatically; the rest are
    /// activated explicitly.
    pub fn is_recurring(&self) -> bool {
        matches!(self, QuestType::Daily | QuestType::Weekly)
    }
}

/// What an objective counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// +1 per completed task.
    CompleteTasks,
    /// +1 per completed task in `category`.
    CompleteCategory { category: String },
    /// +1 per completed task with exactly `priority`.
    CompletePriority { priority: Priority },
    /// + the XP amount of every XP gain.
    EarnXp,
    /// Tracks the streak length, never decreasing.
    MaintainStreak,
    /// Objective types this engine cannot track. Never progress.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub id: Uuid,
    pub description: String,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    pub target: u64,
    pub current: u64,
}

impl QuestObjective {
    pub fn is_completed(&self) -> bool {
        self.current >= self.target
    }

    /// Progress fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.current.min(self.target) as f64) / (self.target as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRewards {
    pub xp: u64,
    pub coins: u64,
    #[serde(default)]
    pub gems: u64,
}

impl QuestRewards {
    pub fn is_zero(&self) -> bool {
        self.xp == 0 && self.coins == 0 && self.gems == 0
    }
}

/// Where a quest is in its lifecycle at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    /// Completed and waiting to be claimed.
    Claimable,
    Claimed,
    /// Past its end date without being claimed. Rewards are forfeited.
    Expired,
}

/// A quest instance owned by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
    pub user_id: String,
    pub template_id: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub objectives: Vec<QuestObjective>,
    pub rewards: QuestRewards,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub claimed: bool,
}

impl Quest {
    /// All objectives reached their targets.
    pub fn is_completed(&self) -> bool {
        self.objectives.iter().all(QuestObjective::is_completed)
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.end_date
    }

    /// Not completed and still running.
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        !self.is_completed() && !self.is_expired(now)
    }

    pub fn is_claimable(&self, now: NaiveDateTime) -> bool {
        self.is_completed() && !self.claimed && !self.is_expired(now)
    }

    pub fn status(&self, now: NaiveDateTime) -> QuestStatus {
        if self.claimed {
            QuestStatus::Claimed
        } else if self.is_expired(now) {
            QuestStatus::Expired
        } else if self.is_completed() {
            QuestStatus::Claimable
        } else {
            QuestStatus::Active
        }
    }
}

/// Objective as written in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub description: String,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    pub target: u64,
}

/// Static catalog entry quests are instantiated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub objectives: Vec<ObjectiveSpec>,
    pub rewards: QuestRewards,
}
