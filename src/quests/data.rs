//! Built-in quest templates.

use super::types::{ObjectiveKind, ObjectiveSpec, QuestRewards, QuestTemplate, QuestType};
use crate::config::CatalogError;
use crate::tasks::Priority;
use once_cell::sync::Lazy;
use std::collections::HashSet;

fn tasks(description: &str, target: u64) -> ObjectiveSpec {
    ObjectiveSpec {
        description: description.to_string(),
        kind: ObjectiveKind::CompleteTasks,
        target,
    }
}

fn category(description: &str, name: &str, target: u64) -> ObjectiveSpec {
    ObjectiveSpec {
        description: description.to_string(),
        kind: ObjectiveKind::CompleteCategory {
            category: name.to_string(),
        },
        target,
    }
}

fn priority(description: &str, priority: Priority, target: u64) -> ObjectiveSpec {
    ObjectiveSpec {
        description: description.to_string(),
        kind: ObjectiveKind::CompletePriority { priority },
        target,
    }
}

fn xp(description: &str, target: u64) -> ObjectiveSpec {
    ObjectiveSpec {
        description: description.to_string(),
        kind: ObjectiveKind::EarnXp,
        target,
    }
}

fn streak(description: &str, target: u64) -> ObjectiveSpec {
    ObjectiveSpec {
        description: description.to_string(),
        kind: ObjectiveKind::MaintainStreak,
        target,
    }
}

fn template(
    id: &str,
    quest_type: QuestType,
    title: &str,
    description: &str,
    icon: &str,
    objectives: Vec<ObjectiveSpec>,
    rewards: (u64, u64, u64),
) -> QuestTemplate {
    let (xp, coins, gems) = rewards;
    QuestTemplate {
        id: id.to_string(),
        quest_type,
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        objectives,
        rewards: QuestRewards { xp, coins, gems },
    }
}

fn builtin_templates() -> Vec<QuestTemplate> {
    use QuestType::{Daily, Special, Weekly};
    vec![
        // Daily
        template(
            "daily_complete_3",
            Daily,
            "Warming Up",
            "Complete 3 tasks today",
            "🎯",
            vec![tasks("Complete 3 tasks", 3)],
            (50, 20, 0),
        ),
        template(
            "daily_complete_5",
            Daily,
            "Productive Day",
            "Complete 5 tasks today",
            "⚡",
            vec![tasks("Complete 5 tasks", 5)],
            (100, 40, 0),
        ),
        template(
            "daily_xp_100",
            Daily,
            "XP Hunter",
            "Earn 100 XP today",
            "✨",
            vec![xp("Earn 100 XP", 100)],
            (25, 30, 0),
        ),
        template(
            "daily_high_priority",
            Daily,
            "First Things First",
            "Complete 2 high priority tasks",
            "🔥",
            vec![priority("Complete 2 high priority tasks", Priority::High, 2)],
            (75, 35, 0),
        ),
        template(
            "daily_work",
            Daily,
            "Office Hero",
            "Complete 3 work tasks",
            "💼",
            vec![category("Complete 3 work tasks", "Work", 3)],
            (75, 30, 0),
        ),
        template(
            "daily_personal",
            Daily,
            "Me Time",
            "Complete 2 personal tasks",
            "🧘",
            vec![category("Complete 2 personal tasks", "Personal", 2)],
            (50, 25, 0),
        ),
        template(
            "daily_health",
            Daily,
            "Healthy Living",
            "Complete 2 health tasks",
            "❤️",
            vec![category("Complete 2 health tasks", "Health", 2)],
            (50, 25, 0),
        ),
        template(
            "daily_variety",
            Daily,
            "Variety Pack",
            "Complete tasks in 3 different categories",
            "🌈",
            vec![
                category("One work task", "Work", 1),
                category("One personal task", "Personal", 1),
                category("One health task", "Health", 1),
            ],
            (100, 50, 0),
        ),
        // Weekly
        template(
            "weekly_complete_20",
            Weekly,
            "Hard Worker",
            "Complete 20 tasks this week",
            "🏋️",
            vec![tasks("Complete 20 tasks", 20)],
            (300, 150, 5),
        ),
        template(
            "weekly_complete_35",
            Weekly,
            "Productivity Machine",
            "Complete 35 tasks this week",
            "🤖",
            vec![tasks("Complete 35 tasks", 35)],
            (500, 250, 10),
        ),
        template(
            "weekly_xp_500",
            Weekly,
            "XP Accumulator",
            "Earn 500 XP this week",
            "💫",
            vec![xp("Earn 500 XP", 500)],
            (100, 100, 3),
        ),
        template(
            "weekly_streak_7",
            Weekly,
            "Consistency",
            "Keep a 7-day streak",
            "🔥",
            vec![streak("Reach a 7-day streak", 7)],
            (250, 125, 5),
        ),
        template(
            "weekly_all_categories",
            Weekly,
            "Life Balance",
            "Complete tasks across all areas of life",
            "⚖️",
            vec![
                category("Work tasks", "Work", 3),
                category("Personal tasks", "Personal", 3),
                category("Health tasks", "Health", 2),
                category("Learning tasks", "Learning", 2),
                category("Leisure tasks", "Leisure", 2),
            ],
            (400, 200, 8),
        ),
        template(
            "weekly_critical",
            Weekly,
            "Crisis Manager",
            "Complete 5 critical tasks",
            "🚨",
            vec![priority("Complete 5 critical tasks", Priority::Critical, 5)],
            (350, 175, 7),
        ),
        // Special
        template(
            "special_new_year",
            Special,
            "New Resolutions",
            "Start the year on the right foot",
            "🎆",
            vec![tasks("Complete 10 tasks", 10), xp("Earn 200 XP", 200)],
            (500, 250, 15),
        ),
        template(
            "special_productivity_week",
            Special,
            "Productivity Week",
            "Limited event: clear 50 tasks",
            "🚀",
            vec![tasks("Complete 50 tasks", 50)],
            (1000, 500, 25),
        ),
    ]
}

static BUILTIN_CATALOG: Lazy<QuestCatalog> = Lazy::new(|| QuestCatalog {
    templates: builtin_templates(),
});

/// Immutable set of quest templates.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestCatalog {
    templates: Vec<QuestTemplate>,
}

impl QuestCatalog {
    /// Builds a catalog. Ids must be unique and every template needs at
    /// least one objective, each with a target above zero.
    pub fn new(templates: Vec<QuestTemplate>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for t in &templates {
            if !ids.insert(t.id.as_str()) {
                return Err(CatalogError::DuplicateId(t.id.clone()));
            }
            if t.objectives.is_empty() {
                return Err(CatalogError::InvalidTemplate {
                    id: t.id.clone(),
                    reason: "no objectives".to_string(),
                });
            }
            if let Some(o) = t.objectives.iter().find(|o| o.target == 0) {
                return Err(CatalogError::InvalidTemplate {
                    id: t.id.clone(),
                    reason: format!("objective '{}' has a zero target", o.description),
                });
            }
        }
        Ok(Self { templates })
    }

    pub fn builtin() -> &'static QuestCatalog {
        &BUILTIN_CATALOG
    }

    /// Parses a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<QuestTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn get(&self, id: &str) -> Option<&QuestTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn of_type(&self, quest_type: QuestType) -> Vec<&QuestTemplate> {
        self.templates
            .iter()
            .filter(|t| t.quest_type == quest_type)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
