//! TOML representations of the catalog files and their conversion

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::achievements::{AchievementDefinition, AchievementType, Reward};
use crate::actions::{ActionDefinition, Precondition, PreconditionKind, SleepTransition};
use crate::catalog::CatalogError;
use crate::ledger::shop::DEFAULT_UNLOCK_RARITY;
use crate::ledger::{ItemDefinition, ItemKind};
use crate::minigame::{GameDefinition, GameType};
use crate::pet::StatName;

fn parse_file<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, CatalogError> {
    toml::from_str(content).map_err(|e| CatalogError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })
}

fn stat(name: &str) -> Result<StatName, CatalogError> {
    StatName::parse(name).ok_or_else(|| CatalogError::UnknownStat(name.to_string()))
}

/// A stat change as written in TOML
#[derive(Debug, Deserialize)]
struct TomlEffect {
    stat: String,
    delta: i32,
}

fn effects(raw: Vec<TomlEffect>) -> Result<Vec<(StatName, i32)>, CatalogError> {
    raw.into_iter()
        .map(|e| Ok((stat(&e.stat)?, e.delta)))
        .collect()
}

// === ACTIONS ===

#[derive(Debug, Deserialize)]
struct TomlActions {
    actions: Vec<TomlAction>,
}

#[derive(Debug, Deserialize)]
struct TomlAction {
    name: String,
    display_name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    effects: Vec<TomlEffect>,
    #[serde(default)]
    preconditions: Vec<TomlPrecondition>,
    #[serde(default)]
    allowed_while_asleep: bool,
    sleep: Option<String>,
    counter: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TomlPrecondition {
    kind: String,
    stat: Option<String>,
    threshold: Option<u8>,
    reason: String,
}

impl TomlPrecondition {
    fn into_precondition(self, action: &str) -> Result<Precondition, CatalogError> {
        let invalid = |why: &str| CatalogError::InvalidPrecondition {
            action: action.to_string(),
            reason: why.to_string(),
        };

        let kind = match self.kind.as_str() {
            "must_be_asleep" => PreconditionKind::MustBeAsleep,
            "stat_below" | "stat_above" => {
                let stat = stat(self.stat.as_deref().ok_or_else(|| invalid("missing stat"))?)?;
                let threshold = self.threshold.ok_or_else(|| invalid("missing threshold"))?;
                if self.kind == "stat_below" {
                    PreconditionKind::StatBelow { stat, threshold }
                } else {
                    PreconditionKind::StatAbove { stat, threshold }
                }
            }
            other => return Err(invalid(&format!("unknown kind '{}'", other))),
        };
        Ok(Precondition { kind, reason: self.reason })
    }
}

impl TomlAction {
    fn into_action(self) -> Result<ActionDefinition, CatalogError> {
        let preconditions = self
            .preconditions
            .into_iter()
            .map(|p| p.into_precondition(&self.name))
            .collect::<Result<Vec<_>, _>>()?;

        let sleep = match self.sleep.as_deref() {
            None => None,
            Some("fall_asleep") => Some(SleepTransition::FallAsleep),
            Some("wake_up") => Some(SleepTransition::WakeUp),
            Some(other) => {
                return Err(CatalogError::Invalid(format!(
                    "action {}: unknown sleep transition '{}'",
                    self.name, other
                )))
            }
        };

        let counter = match self.counter {
            None => None,
            Some(name) => {
                let t = AchievementType::parse(&name)
                    .ok_or(CatalogError::UnknownAchievementType(name))?;
                if !t.is_cumulative() {
                    return Err(CatalogError::Invalid(format!(
                        "action {}: counter {} is not cumulative",
                        self.name,
                        t.as_str()
                    )));
                }
                Some(t)
            }
        };

        Ok(ActionDefinition {
            effects: effects(self.effects)?,
            preconditions,
            allowed_while_asleep: self.allowed_while_asleep,
            sleep,
            counter,
            name: self.name,
            display_name: self.display_name,
            icon: self.icon,
            description: self.description,
            message: self.message,
        })
    }
}

pub(crate) fn parse_actions(content: &str) -> Result<Vec<ActionDefinition>, CatalogError> {
    let data: TomlActions = parse_file("actions.toml", content)?;
    data.actions.into_iter().map(TomlAction::into_action).collect()
}

// === ACHIEVEMENTS ===

#[derive(Debug, Deserialize)]
struct TomlAchievements {
    achievements: Vec<TomlAchievement>,
}

#[derive(Debug, Deserialize)]
struct TomlAchievement {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    #[serde(rename = "type")]
    achievement_type: String,
    target: u32,
    #[serde(default)]
    reward: TomlReward,
}

#[derive(Debug, Default, Deserialize)]
struct TomlReward {
    #[serde(default)]
    coins: u32,
    #[serde(default)]
    experience: u32,
    item: Option<String>,
    title: Option<String>,
}

impl TomlAchievement {
    fn into_achievement(self) -> Result<AchievementDefinition, CatalogError> {
        let achievement_type = AchievementType::parse(&self.achievement_type)
            .ok_or(CatalogError::UnknownAchievementType(self.achievement_type))?;
        Ok(AchievementDefinition {
            id: self.id,
            name: self.name,
            description: self.description,
            icon: self.icon,
            achievement_type,
            target: self.target,
            reward: Reward {
                coins: self.reward.coins,
                experience: self.reward.experience,
                item: self.reward.item,
                title: self.reward.title,
            },
        })
    }
}

pub(crate) fn parse_achievements(content: &str) -> Result<Vec<AchievementDefinition>, CatalogError> {
    let data: TomlAchievements = parse_file("achievements.toml", content)?;
    data.achievements
        .into_iter()
        .map(TomlAchievement::into_achievement)
        .collect()
}

// === GAMES ===

#[derive(Debug, Deserialize)]
struct TomlGames {
    games: Vec<TomlGame>,
}

#[derive(Debug, Deserialize)]
struct TomlGame {
    #[serde(rename = "type")]
    game_type: String,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
    difficulty: u8,
    max_reward: u32,
    max_rounds: u32,
    time_limit_secs: Option<u32>,
}

impl TomlGame {
    fn into_game(self) -> Result<GameDefinition, CatalogError> {
        let game_type = GameType::parse(&self.game_type)
            .ok_or(CatalogError::UnknownGameType(self.game_type))?;
        if self.max_rounds == 0 {
            return Err(CatalogError::Invalid(format!(
                "game {}: max_rounds must be at least 1",
                game_type.as_str()
            )));
        }
        Ok(GameDefinition {
            game_type,
            name: self.name,
            icon: self.icon,
            description: self.description,
            difficulty: self.difficulty,
            max_reward: self.max_reward,
            max_rounds: self.max_rounds,
            time_limit_secs: self.time_limit_secs,
        })
    }
}

pub(crate) fn parse_games(content: &str) -> Result<Vec<GameDefinition>, CatalogError> {
    let data: TomlGames = parse_file("games.toml", content)?;
    data.games.into_iter().map(TomlGame::into_game).collect()
}

// === ITEMS ===

#[derive(Debug, Deserialize)]
struct TomlItems {
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
    kind: String,
    cost: u32,
    rarity: u8,
    #[serde(default)]
    effects: Vec<TomlEffect>,
    unlocked: Option<bool>,
}

impl TomlItem {
    fn into_item(self) -> Result<ItemDefinition, CatalogError> {
        let kind = ItemKind::parse(&self.kind).ok_or(CatalogError::UnknownItemKind(self.kind))?;
        if !(1..=5).contains(&self.rarity) {
            return Err(CatalogError::Invalid(format!(
                "item {}: rarity {} outside 1..=5",
                self.id, self.rarity
            )));
        }
        Ok(ItemDefinition {
            kind,
            cost: self.cost,
            rarity: self.rarity,
            effects: effects(self.effects)?,
            unlocked: self.unlocked.unwrap_or(self.rarity <= DEFAULT_UNLOCK_RARITY),
            id: self.id,
            name: self.name,
            icon: self.icon,
            description: self.description,
        })
    }
}

pub(crate) fn parse_items(content: &str) -> Result<Vec<ItemDefinition>, CatalogError> {
    let data: TomlItems = parse_file("items.toml", content)?;
    data.items.into_iter().map(TomlItem::into_item).collect()
}
