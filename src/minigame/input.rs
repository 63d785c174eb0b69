//! Player input for mini-game sessions

use serde::{Deserialize, Serialize};

/// One move submitted by the player.
///
/// Each game accepts a subset of these; `TimeUp` is accepted by every game
/// and is sent by the delivering layer when the advisory time limit runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameInput {
    /// Memory: next symbol of the remembered sequence
    Select { symbol: String },
    /// Puzzle: drop a piece on a grid cell
    Place { piece: u32, cell: u32 },
    /// SpotDifference / PrecisionShooting: a point on the board
    Point { x: i32, y: i32 },
    /// Reaction: click one of the shown targets
    Click { target: u32 },
    /// WhackMole: hit one of the pops
    Whack { pop: u32 },
    /// MusicDance / DrumGame: hit a beat, `offset_ms` off the exact time
    Beat { beat: u32, offset_ms: i32 },
    /// SingingContest: scores for one sung phrase, each 0.0..=1.0
    Phrase { pitch: f64, rhythm: f64 },
    /// PetCareChallenge: attempt a task with the value achieved
    Care { task: u32, value: u32 },
    /// TreasureHunt: search a room
    Search { room: String },
    /// Tap: a batch of taps
    Taps { count: u32 },
    TimeUp,
}

impl GameInput {
    pub fn kind(&self) -> &'static str {
        match self {
            GameInput::Select { .. } => "select",
            GameInput::Place { .. } => "place",
            GameInput::Point { .. } => "point",
            GameInput::Click { .. } => "click",
            GameInput::Whack { .. } => "whack",
            GameInput::Beat { .. } => "beat",
            GameInput::Phrase { .. } => "phrase",
            GameInput::Care { .. } => "care",
            GameInput::Search { .. } => "search",
            GameInput::Taps { .. } => "taps",
            GameInput::TimeUp => "time_up",
        }
    }
}
