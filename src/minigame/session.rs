//! A single mini-game session

use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};
use crate::core::types::{PetId, PlayerId, SessionId, Timestamp};
use crate::minigame::payload::GamePayload;
use crate::minigame::rules::ComboChange;
use crate::minigame::state::GameState;
use crate::minigame::GameType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniGameSession {
    pub id: SessionId,
    pub player: PlayerId,
    /// Pet that receives the experience reward
    pub pet: PetId,
    pub game_type: GameType,
    state: GameState,
    /// State to return to on resume
    paused_from: Option<GameState>,
    history: Vec<GameState>,
    pub score: i32,
    /// 1-based
    pub current_round: u32,
    pub max_rounds: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub payload: GamePayload,
}

impl MiniGameSession {
    /// A fresh session in `Preparing`
    pub fn new(
        player: PlayerId,
        pet: PetId,
        game_type: GameType,
        max_rounds: u32,
        payload: GamePayload,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SessionId::new(),
            player,
            pet,
            game_type,
            state: GameState::Preparing,
            paused_from: None,
            history: vec![GameState::Preparing],
            score: 0,
            current_round: 1,
            max_rounds: max_rounds.max(1),
            combo: 0,
            best_combo: 0,
            started_at: now,
            ended_at: None,
            payload,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Every state visited, in order
    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.max_rounds
    }

    /// Move along a legal edge, recording it in the history
    pub fn transition(&mut self, next: GameState) -> Result<()> {
        if self.state.is_terminal() {
            return Err(PetError::AlreadyTerminal(self.id));
        }
        if !self.state.can_transition_to(next) {
            return Err(PetError::precondition(format!(
                "cannot go from {:?} to {:?}",
                self.state, next
            )));
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(PetError::AlreadyTerminal(self.id));
        }
        if !self.state.can_pause() {
            return Err(PetError::precondition(format!(
                "cannot pause while {:?}",
                self.state
            )));
        }
        let from = self.state;
        self.transition(GameState::Paused)?;
        self.paused_from = Some(from);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(PetError::AlreadyTerminal(self.id));
        }
        let Some(back_to) = self.paused_from else {
            return Err(PetError::precondition("game is not paused"));
        };
        self.transition(back_to)?;
        self.paused_from = None;
        Ok(())
    }

    pub fn apply_combo(&mut self, change: ComboChange) {
        match change {
            ComboChange::Keep => {}
            ComboChange::Extend(n) => {
                self.combo = self.combo.saturating_add(n);
                self.best_combo = self.best_combo.max(self.combo);
            }
            ComboChange::Break => self.combo = 0,
        }
    }

    /// Close the session; the state must already be terminal
    pub fn end(&mut self, now: Timestamp) {
        self.ended_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::payload::TapRound;

    fn session() -> MiniGameSession {
        MiniGameSession::new(
            PlayerId::new("p"),
            PetId::new(),
            GameType::Tap,
            1,
            GamePayload::Tap(TapRound::default()),
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let mut s = session();
        let err = s.transition(GameState::GameComplete).unwrap_err();
        assert!(matches!(err, PetError::PreconditionFailed(_)));
        assert_eq!(s.history(), &[GameState::Preparing]);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut s = session();
        s.transition(GameState::WaitingInput).unwrap();
        s.pause().unwrap();
        assert_eq!(s.state(), GameState::Paused);
        s.resume().unwrap();
        assert_eq!(s.state(), GameState::WaitingInput);
        assert!(s.resume().is_err());
    }

    #[test]
    fn test_terminal_is_final() {
        let mut s = session();
        s.transition(GameState::Playing).unwrap();
        s.transition(GameState::Failed).unwrap();
        assert_eq!(s.transition(GameState::Playing), Err(PetError::AlreadyTerminal(s.id)));
        assert_eq!(s.pause(), Err(PetError::AlreadyTerminal(s.id)));
    }

    #[test]
    fn test_combo_tracking() {
        let mut s = session();
        s.apply_combo(ComboChange::Extend(3));
        s.apply_combo(ComboChange::Break);
        s.apply_combo(ComboChange::Extend(1));
        assert_eq!(s.combo, 1);
        assert_eq!(s.best_combo, 3);
    }
}
