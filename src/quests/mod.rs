//! Quest lifecycle: templates, generation, progress and claiming.

pub mod data;
pub mod lifecycle;
pub mod progress;
pub mod types;

pub use data::QuestCatalog;
pub use lifecycle::{
    activate_special_quest, active_quests, claim_quest, claimable_quests, completed_quests,
    generate_quests, instantiate, quest_end_date, quests_of_type, ClaimedQuest, GenerationReport,
};
pub use progress::{apply_quest_event, QuestEvent, QuestProgress};
pub use types::{
    ObjectiveKind, ObjectiveSpec, Quest, QuestObjective, QuestRewards, QuestStatus, QuestTemplate,
    QuestType,
};
