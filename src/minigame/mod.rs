//! Mini-games: round-based sessions with scoring and terminal rewards

pub mod input;
pub mod manager;
pub mod payload;
pub mod rules;
pub mod session;
pub mod state;

pub use input::GameInput;
pub use manager::{GameSettlement, InputOutcome, MiniGameSessionManager};
pub use payload::GamePayload;
pub use session::MiniGameSession;
pub use state::GameState;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Memory,
    Puzzle,
    SpotDifference,
    Reaction,
    PrecisionShooting,
    WhackMole,
    MusicDance,
    DrumGame,
    SingingContest,
    PetCareChallenge,
    TreasureHunt,
    Tap,
}

impl GameType {
    pub const ALL: [GameType; 12] = [
        GameType::Memory,
        GameType::Puzzle,
        GameType::SpotDifference,
        GameType::Reaction,
        GameType::PrecisionShooting,
        GameType::WhackMole,
        GameType::MusicDance,
        GameType::DrumGame,
        GameType::SingingContest,
        GameType::PetCareChallenge,
        GameType::TreasureHunt,
        GameType::Tap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Memory => "memory",
            GameType::Puzzle => "puzzle",
            GameType::SpotDifference => "spot_difference",
            GameType::Reaction => "reaction",
            GameType::PrecisionShooting => "precision_shooting",
            GameType::WhackMole => "whack_mole",
            GameType::MusicDance => "music_dance",
            GameType::DrumGame => "drum_game",
            GameType::SingingContest => "singing_contest",
            GameType::PetCareChallenge => "pet_care_challenge",
            GameType::TreasureHunt => "treasure_hunt",
            GameType::Tap => "tap",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(&name))
    }

    pub fn category(&self) -> GameCategory {
        match self {
            GameType::Memory | GameType::Puzzle | GameType::SpotDifference => GameCategory::Brain,
            GameType::Reaction | GameType::PrecisionShooting | GameType::WhackMole => {
                GameCategory::Reflex
            }
            GameType::MusicDance | GameType::DrumGame | GameType::SingingContest => {
                GameCategory::Rhythm
            }
            GameType::PetCareChallenge | GameType::TreasureHunt => GameCategory::Creative,
            GameType::Tap => GameCategory::Classic,
        }
    }

    /// Singing opens on a prompt rather than live play
    pub fn opening_state(&self) -> GameState {
        match self {
            GameType::SingingContest => GameState::WaitingInput,
            _ => GameState::Playing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    Brain,
    Reflex,
    Rhythm,
    Creative,
    Classic,
}

/// Static description of a mini-game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDefinition {
    pub game_type: GameType,
    pub name: String,
    pub icon: String,
    pub description: String,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    /// Coin cap for a won session
    pub max_reward: u32,
    pub max_rounds: u32,
    /// Advisory limit; the delivering layer sends `TimeUp` when it expires
    pub time_limit_secs: Option<u32>,
}
