//! Catalog configuration.
//!
//! Built-in catalogs can be overridden by JSON files in the data directory
//! (`~/.questify/achievements.json`, `~/.questify/quest_templates.json`).

use crate::achievements::AchievementCatalog;
use crate::core::constants::{ACHIEVEMENT_CATALOG_FILE, QUEST_CATALOG_FILE};
use crate::quests::QuestCatalog;
use crate::utils::persistence::data_dir;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    #[error("invalid quest template {id}: {reason}")]
    InvalidTemplate { id: String, reason: String },
}

/// The catalogs the engine evaluates against. Shared and read-only.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub achievements: Arc<AchievementCatalog>,
    pub quests: Arc<QuestCatalog>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogConfig {
    pub fn builtin() -> Self {
        Self {
            achievements: Arc::new(AchievementCatalog::builtin().clone()),
            quests: Arc::new(QuestCatalog::builtin().clone()),
        }
    }

    /// Loads catalogs from the default data directory.
    pub fn load() -> Self {
        match data_dir() {
            Ok(dir) => Self::load_from(&dir),
            Err(e) => {
                warn!(error = %e, "data directory unavailable, using built-in catalogs");
                Self::builtin()
            }
        }
    }

    /// Loads catalogs from `dir`. A missing file means the built-in catalog;
    /// an unreadable or invalid one is logged and also falls back.
    pub fn load_from(dir: &Path) -> Self {
        let achievements = load_catalog(
            &dir.join(ACHIEVEMENT_CATALOG_FILE),
            AchievementCatalog::from_json,
        )
        .unwrap_or_else(|| AchievementCatalog::builtin().clone());
        let quests = load_catalog(&dir.join(QUEST_CATALOG_FILE), QuestCatalog::from_json)
            .unwrap_or_else(|| QuestCatalog::builtin().clone());

        Self {
            achievements: Arc::new(achievements),
            quests: Arc::new(quests),
        }
    }
}

fn load_catalog<T>(path: &Path, parse: fn(&str) -> Result<T, CatalogError>) -> Option<T> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read catalog, using built-in");
            return None;
        }
    };
    match parse(&json) {
        Ok(catalog) => {
            info!(path = %path.display(), "loaded catalog override");
            Some(catalog)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid catalog, using built-in");
            None
        }
    }
}
