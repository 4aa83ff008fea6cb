//! Quest generation, expiry, claiming and views.

use super::data::QuestCatalog;
use super::types::{Quest, QuestObjective, QuestRewards, QuestTemplate, QuestType};
use crate::core::constants::{DAILY_QUEST_COUNT, SPECIAL_QUEST_DURATION_DAYS, WEEKLY_QUEST_COUNT};
use crate::stats::{LevelUp, PlayerStats};
use crate::utils::dates::{end_of_day, end_of_iso_week, start_of_day, start_of_iso_week};
use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Uuid whose random bits come from `rng`, so seeded runs repeat exactly.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// When a quest of `quest_type` created at `now` expires.
///
/// Daily quests end at the close of the creation day, weekly quests at the
/// close of the ISO week's Sunday, everything else after a fixed period.
pub fn quest_end_date(quest_type: QuestType, now: NaiveDateTime) -> NaiveDateTime {
    match quest_type {
        QuestType::Daily => end_of_day(now.date()),
        QuestType::Weekly => end_of_day(end_of_iso_week(now.date())),
        QuestType::Special | QuestType::Story => now + Duration::days(SPECIAL_QUEST_DURATION_DAYS),
    }
}

/// Fresh quest from a template with all objectives at 0.
pub fn instantiate<R: Rng + ?Sized>(
    template: &QuestTemplate,
    user_id: &str,
    now: NaiveDateTime,
    rng: &mut R,
) -> Quest {
    let id = random_uuid(rng);
    let objectives = template
        .objectives
        .iter()
        .map(|spec| QuestObjective {
            id: random_uuid(rng),
            description: spec.description.clone(),
            kind: spec.kind.clone(),
            target: spec.target,
            current: 0,
        })
        .collect();

    Quest {
        id,
        user_id: user_id.to_string(),
        template_id: template.id.clone(),
        quest_type: template.quest_type,
        title: template.title.clone(),
        description: template.description.clone(),
        icon: template.icon.clone(),
        objectives,
        rewards: template.rewards,
        start_date: now,
        end_date: quest_end_date(template.quest_type, now),
        completed_at: None,
        claimed: false,
    }
}

/// Picks up to `count` distinct templates.
pub fn select_templates<'a, R: Rng + ?Sized>(
    templates: &[&'a QuestTemplate],
    count: usize,
    rng: &mut R,
) -> Vec<&'a QuestTemplate> {
    templates.choose_multiple(rng, count).copied().collect()
}

/// What a generation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub created: Vec<Quest>,
    pub removed: Vec<Quest>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Drops quests that ended before today and tops up missing dailies/weeklies.
///
/// Unclaimed expired quests are dropped too, forfeiting their rewards. New
/// dailies are only created when none started today, and new weeklies only
/// when none started in the current ISO week, so repeated calls on the same
/// day leave the quest set untouched.
pub fn generate_quests<R: Rng + ?Sized>(
    quests: &mut Vec<Quest>,
    user_id: &str,
    catalog: &QuestCatalog,
    now: NaiveDateTime,
    rng: &mut R,
) -> GenerationReport {
    let today = now.date();
    let cutoff = start_of_day(today);
    let mut report = GenerationReport::default();

    let (expired, kept): (Vec<Quest>, Vec<Quest>) =
        quests.drain(..).partition(|q| q.end_date < cutoff);
    *quests = kept;
    for q in &expired {
        if !q.claimed && q.is_completed() {
            info!(user = user_id, quest = %q.title, "unclaimed quest expired, reward forfeited");
        }
    }
    report.removed = expired;

    let has_todays_dailies = quests
        .iter()
        .any(|q| q.quest_type == QuestType::Daily && q.start_date.date() == today);
    if !has_todays_dailies {
        let templates = catalog.of_type(QuestType::Daily);
        for template in select_templates(&templates, DAILY_QUEST_COUNT, rng) {
            report.created.push(instantiate(template, user_id, now, rng));
        }
    }

    let week_start = start_of_iso_week(today);
    let has_weeklies = quests
        .iter()
        .any(|q| q.quest_type == QuestType::Weekly && q.start_date.date() >= week_start);
    if !has_weeklies {
        let templates = catalog.of_type(QuestType::Weekly);
        for template in select_templates(&templates, WEEKLY_QUEST_COUNT, rng) {
            report.created.push(instantiate(template, user_id, now, rng));
        }
    }

    quests.extend(report.created.iter().cloned());

    if !report.is_empty() {
        info!(
            user = user_id,
            created = report.created.len(),
            removed = report.removed.len(),
            "quests refreshed"
        );
    }
    report
}

/// Starts a special (or story) quest from `template_id`.
///
/// Returns `None` for unknown or recurring templates, or when an unexpired
/// instance of the same template is already present.
pub fn activate_special_quest<R: Rng + ?Sized>(
    quests: &mut Vec<Quest>,
    user_id: &str,
    catalog: &QuestCatalog,
    template_id: &str,
    now: NaiveDateTime,
    rng: &mut R,
) -> Option<Quest> {
    let template = catalog.get(template_id)?;
    if template.quest_type.is_recurring() {
        debug!(template = template_id, "recurring templates are generated, not activated");
        return None;
    }
    if quests
        .iter()
        .any(|q| q.template_id == template_id && !q.is_expired(now))
    {
        return None;
    }

    let quest = instantiate(template, user_id, now, rng);
    info!(user = user_id, quest = %quest.title, "special quest activated");
    quests.push(quest.clone());
    Some(quest)
}

/// A successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedQuest {
    pub quest_id: Uuid,
    pub title: String,
    pub quest_type: QuestType,
    pub rewards: QuestRewards,
    pub level_up: Option<LevelUp>,
}

/// Grants a completed quest's rewards once.
///
/// Unknown, incomplete, already claimed and expired quests return `None`
/// without touching anything. Quest XP is flat: no streak bonus applies.
pub fn claim_quest(
    quests: &mut [Quest],
    stats: &mut PlayerStats,
    quest_id: Uuid,
    now: NaiveDateTime,
) -> Option<ClaimedQuest> {
    let quest = quests.iter_mut().find(|q| q.id == quest_id)?;
    if !quest.is_claimable(now) {
        debug!(quest = %quest_id, status = ?quest.status(now), "quest not claimable");
        return None;
    }

    quest.claimed = true;
    let rewards = quest.rewards;
    let level_up = stats.gain_xp(rewards.xp);
    stats.add_coins(rewards.coins);
    stats.add_gems(rewards.gems);
    stats.quests_completed += 1;
    if quest.quest_type == QuestType::Daily {
        stats.daily_quests_completed += 1;
    }

    info!(
        user = %stats.user_id,
        quest = %quest.title,
        xp = rewards.xp,
        coins = rewards.coins,
        gems = rewards.gems,
        "quest claimed"
    );

    Some(ClaimedQuest {
        quest_id,
        title: quest.title.clone(),
        quest_type: quest.quest_type,
        rewards,
        level_up,
    })
}

/// Quests still being worked on.
pub fn active_quests(quests: &[Quest], now: NaiveDateTime) -> Vec<&Quest> {
    quests.iter().filter(|q| q.is_active(now)).collect()
}

/// Completed quests waiting for a claim.
pub fn claimable_quests(quests: &[Quest], now: NaiveDateTime) -> Vec<&Quest> {
    quests.iter().filter(|q| q.is_claimable(now)).collect()
}

pub fn completed_quests(quests: &[Quest]) -> Vec<&Quest> {
    quests.iter().filter(|q| q.is_completed()).collect()
}

pub fn quests_of_type(quests: &[Quest], quest_type: QuestType) -> Vec<&Quest> {
    quests.iter().filter(|q| q.quest_type == quest_type).collect()
}
