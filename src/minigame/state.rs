//! Mini-game session states and legal transitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Preparing,
    Playing,
    WaitingInput,
    RoundComplete,
    Paused,
    GameComplete,
    Failed,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::GameComplete | GameState::Failed)
    }

    /// States that accept player input
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            GameState::Playing | GameState::WaitingInput | GameState::RoundComplete
        )
    }

    /// States a session can be paused from
    pub fn can_pause(&self) -> bool {
        matches!(self, GameState::Playing | GameState::WaitingInput)
    }

    /// Whether `self -> next` is a legal edge.
    ///
    /// `Paused` may return to either in-round state; the session remembers
    /// which one it left and only resumes to that.
    pub fn can_transition_to(&self, next: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, next),
            (Preparing, Playing)
                | (Preparing, WaitingInput)
                | (Playing, WaitingInput)
                | (Playing, RoundComplete)
                | (Playing, Paused)
                | (Playing, Failed)
                | (WaitingInput, Playing)
                | (WaitingInput, WaitingInput)
                | (WaitingInput, RoundComplete)
                | (WaitingInput, Paused)
                | (WaitingInput, Failed)
                | (RoundComplete, Playing)
                | (RoundComplete, GameComplete)
                | (Paused, Playing)
                | (Paused, WaitingInput)
        )
    }
}
