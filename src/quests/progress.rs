//! Objective progress from gameplay events.

use super::types::{ObjectiveKind, Quest, QuestObjective};
use crate::tasks::Priority;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Gameplay events quests react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuestEvent {
    TaskCompleted {
        category: Option<String>,
        priority: Priority,
    },
    XpGained {
        amount: u64,
    },
    StreakUpdated {
        streak: u32,
    },
}

/// One objective that moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: Uuid,
    pub objective_id: Uuid,
    pub previous: u64,
    pub current: u64,
    pub objective_completed: bool,
    /// This update finished the whole quest.
    pub quest_completed: bool,
}

/// New `current` for an objective after `event`, clamped to its target.
fn advance(objective: &QuestObjective, event: &QuestEvent) -> u64 {
    let gain = match (&objective.kind, event) {
        (ObjectiveKind::CompleteTasks, QuestEvent::TaskCompleted { .. }) => 1,
        (
            ObjectiveKind::CompleteCategory { category },
            QuestEvent::TaskCompleted {
                category: Some(done),
                ..
            },
        ) if category == done => 1,
        (
            ObjectiveKind::CompletePriority { priority },
            QuestEvent::TaskCompleted { priority: done, .. },
        ) if priority == done => 1,
        (ObjectiveKind::EarnXp, QuestEvent::XpGained { amount }) => *amount,
        (ObjectiveKind::MaintainStreak, QuestEvent::StreakUpdated { streak }) => {
            let reached = u64::from(*streak).min(objective.target);
            return reached.max(objective.current);
        }
        _ => 0,
    };
    objective
        .current
        .saturating_add(gain)
        .min(objective.target)
}

/// Applies an event to every running quest.
///
/// Completed, claimed and expired quests are skipped, as are objectives that
/// already reached their target. A quest that finishes gets `completed_at`.
pub fn apply_quest_event(
    quests: &mut [Quest],
    event: &QuestEvent,
    now: NaiveDateTime,
) -> Vec<QuestProgress> {
    let mut changes = Vec::new();

    for quest in quests.iter_mut().filter(|q| q.is_active(now)) {
        let mut moved = Vec::new();
        for objective in quest.objectives.iter_mut() {
            if objective.is_completed() {
                continue;
            }
            let next = advance(objective, event);
            if next > objective.current {
                let previous = objective.current;
                objective.current = next;
                moved.push((objective.id, previous, next, objective.is_completed()));
            }
        }
        if moved.is_empty() {
            continue;
        }

        let finished = quest.is_completed();
        if finished {
            quest.completed_at = Some(now);
            debug!(quest = %quest.title, "quest completed");
        }
        changes.extend(moved.into_iter().map(
            |(objective_id, previous, current, objective_completed)| QuestProgress {
                quest_id: quest.id,
                objective_id,
                previous,
                current,
                objective_completed,
                quest_completed: finished,
            },
        ));
    }

    changes
}
