//! Achievement definitions and per-player progress tracking

pub mod tracker;

pub use tracker::{AchievementProgress, AchievementStatus, AchievementTracker, RewardSink};

use serde::{Deserialize, Serialize};

/// What an achievement measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    FeedCount,
    PlayCount,
    LevelReached,
    CoinsEarned,
    DaysOwned,
    ItemsBought,
    GamesWon,
    PetHappiness,
    PerfectCare,
}

impl AchievementType {
    pub const ALL: [AchievementType; 9] = [
        AchievementType::FeedCount,
        AchievementType::PlayCount,
        AchievementType::LevelReached,
        AchievementType::CoinsEarned,
        AchievementType::DaysOwned,
        AchievementType::ItemsBought,
        AchievementType::GamesWon,
        AchievementType::PetHappiness,
        AchievementType::PerfectCare,
    ];

    /// Cumulative types are incremented; the rest are set to an observed value
    pub fn is_cumulative(&self) -> bool {
        matches!(
            self,
            AchievementType::FeedCount
                | AchievementType::PlayCount
                | AchievementType::CoinsEarned
                | AchievementType::ItemsBought
                | AchievementType::GamesWon
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::FeedCount => "feed_count",
            AchievementType::PlayCount => "play_count",
            AchievementType::LevelReached => "level_reached",
            AchievementType::CoinsEarned => "coins_earned",
            AchievementType::DaysOwned => "days_owned",
            AchievementType::ItemsBought => "items_bought",
            AchievementType::GamesWon => "games_won",
            AchievementType::PetHappiness => "pet_happiness",
            AchievementType::PerfectCare => "perfect_care",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// Granted exactly once when an achievement unlocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub coins: u32,
    pub experience: u32,
    pub item: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub achievement_type: AchievementType,
    pub target: u32,
    pub reward: Reward,
}
