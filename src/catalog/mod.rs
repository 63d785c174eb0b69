//! Static game content
//!
//! Actions, achievements, mini-games and shop items are data. The defaults
//! ship inside the binary from `data/*.toml`; `load_dir` reads the same four
//! files from disk so content can be tuned without a rebuild.

mod loader;

use std::path::Path;

use thiserror::Error;

use crate::achievements::AchievementDefinition;
use crate::actions::ActionDefinition;
use crate::ledger::ItemDefinition;
use crate::minigame::{GameDefinition, GameType};

pub const ACTIONS_FILE: &str = "actions.toml";
pub const ACHIEVEMENTS_FILE: &str = "achievements.toml";
pub const GAMES_FILE: &str = "games.toml";
pub const ITEMS_FILE: &str = "items.toml";

/// Error type for catalog loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Unknown stat: {0}")]
    UnknownStat(String),

    #[error("Unknown achievement type: {0}")]
    UnknownAchievementType(String),

    #[error("Unknown game type: {0}")]
    UnknownGameType(String),

    #[error("Unknown item kind: {0}")]
    UnknownItemKind(String),

    #[error("Invalid precondition on action {action}: {reason}")]
    InvalidPrecondition { action: String, reason: String },

    #[error("Duplicate {kind}: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("{referenced_by} references unknown item {item}")]
    UnknownItem { referenced_by: String, item: String },

    #[error("Invalid catalog entry: {0}")]
    Invalid(String),
}

/// Every definition the engine interprets
#[derive(Debug, Clone)]
pub struct Catalog {
    actions: Vec<ActionDefinition>,
    achievements: Vec<AchievementDefinition>,
    games: Vec<GameDefinition>,
    items: Vec<ItemDefinition>,
}

impl Catalog {
    /// The content compiled into the crate
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(
            include_str!("../../data/actions.toml"),
            include_str!("../../data/achievements.toml"),
            include_str!("../../data/games.toml"),
            include_str!("../../data/items.toml"),
        )
    }

    /// Load the four catalog files from a directory
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))
        };
        Self::parse(
            &read(ACTIONS_FILE)?,
            &read(ACHIEVEMENTS_FILE)?,
            &read(GAMES_FILE)?,
            &read(ITEMS_FILE)?,
        )
    }

    pub fn parse(
        actions: &str,
        achievements: &str,
        games: &str,
        items: &str,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            actions: loader::parse_actions(actions)?,
            achievements: loader::parse_achievements(achievements)?,
            games: loader::parse_games(games)?,
            items: loader::parse_items(items)?,
        };
        catalog.validate()?;
        tracing::debug!(
            actions = catalog.actions.len(),
            achievements = catalog.achievements.len(),
            games = catalog.games.len(),
            items = catalog.items.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Reject duplicate keys and dangling item references
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique("action", self.actions.iter().map(|a| a.name.as_str()))?;
        check_unique("achievement", self.achievements.iter().map(|a| a.id.as_str()))?;
        check_unique("game", self.games.iter().map(|g| g.game_type.as_str()))?;
        check_unique("item", self.items.iter().map(|i| i.id.as_str()))?;

        for achievement in &self.achievements {
            if let Some(item) = &achievement.reward.item {
                if self.item(item).is_none() {
                    return Err(CatalogError::UnknownItem {
                        referenced_by: format!("achievement {}", achievement.id),
                        item: item.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    pub fn achievements(&self) -> &[AchievementDefinition] {
        &self.achievements
    }

    pub fn game(&self, game_type: GameType) -> Option<&GameDefinition> {
        self.games.iter().find(|g| g.game_type == game_type)
    }

    pub fn games(&self) -> &[GameDefinition] {
        &self.games
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    /// Unlocked items, cheapest rarity first
    pub fn shop_items(&self) -> Vec<&ItemDefinition> {
        let mut items: Vec<_> = self.items.iter().filter(|i| i.unlocked).collect();
        items.sort_by_key(|i| (i.rarity, i.cost));
        items
    }
}

fn check_unique<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = ahash::AHashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogError::Duplicate { kind, id: key.to_string() });
        }
    }
    Ok(())
}
