//! Drives sessions through their state machine
//!
//! The manager owns no sessions. The engine keeps at most one per player and
//! hands it in under that player's lock; the manager validates, mutates a
//! working copy and only writes it back when the whole step succeeds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::achievements::RewardSink;
use crate::core::error::{PetError, Result};
use crate::core::types::{PetId, PlayerId, Timestamp};
use crate::minigame::input::GameInput;
use crate::minigame::payload::GamePayload;
use crate::minigame::rules::{self, RoundStatus};
use crate::minigame::session::MiniGameSession;
use crate::minigame::state::GameState;
use crate::minigame::GameDefinition;

/// What one input did to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputOutcome {
    pub points: i32,
    pub message: String,
    pub state: GameState,
    /// Set once the session reached a terminal state
    pub finished: Option<bool>,
}

/// Rewards paid out for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettlement {
    pub success: bool,
    pub coins: u32,
    pub experience: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MiniGameSessionManager;

impl MiniGameSessionManager {
    pub fn new() -> Self {
        Self
    }

    /// Create a session with round 1 generated, already in its opening state
    pub fn start<R: Rng + ?Sized>(
        &self,
        player: PlayerId,
        pet: PetId,
        definition: &GameDefinition,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<MiniGameSession> {
        let game = definition.game_type;
        let payload = GamePayload::generate(game, 1, rng);
        let mut session =
            MiniGameSession::new(player, pet, game, definition.max_rounds, payload, now);
        session.transition(game.opening_state())?;
        tracing::debug!(session = %session.id, ?game, "session started");
        Ok(session)
    }

    /// Handle one input. On error the session is left exactly as it was.
    pub fn process_input<R: Rng + ?Sized>(
        &self,
        session: &mut MiniGameSession,
        input: &GameInput,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<InputOutcome> {
        let state = session.state();
        if state.is_terminal() {
            return Err(PetError::AlreadyTerminal(session.id));
        }
        if !state.accepts_input() {
            return Err(PetError::precondition(match state {
                GameState::Paused => "game is paused",
                _ => "game has not started",
            }));
        }

        let mut working = session.clone();
        if working.state() == GameState::RoundComplete {
            working.transition(GameState::Playing)?;
        }

        let step = rules::handle(&mut working.payload, input, working.combo)?;
        working.score += step.points;
        working.apply_combo(step.combo);

        let finished = match step.status {
            RoundStatus::Open => None,
            RoundStatus::Cleared => {
                working.transition(GameState::RoundComplete)?;
                if working.is_final_round() {
                    working.transition(GameState::GameComplete)?;
                    working.end(now);
                    Some(true)
                } else {
                    working.current_round += 1;
                    working.payload =
                        GamePayload::generate(working.game_type, working.current_round, rng);
                    None
                }
            }
            RoundStatus::Failed => {
                working.transition(GameState::Failed)?;
                working.end(now);
                Some(false)
            }
        };

        *session = working;
        Ok(InputOutcome {
            points: step.points,
            message: step.message,
            state: session.state(),
            finished,
        })
    }

    /// Coins and experience a won session is worth
    pub fn reward_for(definition: &GameDefinition, score: i32) -> (u32, u32) {
        let multiplier = (score / 10).max(1) as u32;
        let coins = definition.max_reward.min(multiplier * 2);
        (coins, coins / 2)
    }

    /// Pay out a terminal session through `sink`. Failed sessions pay nothing.
    pub fn settle(
        &self,
        session: &MiniGameSession,
        definition: &GameDefinition,
        sink: &mut dyn RewardSink,
    ) -> GameSettlement {
        let success = session.state() == GameState::GameComplete;
        if !success {
            tracing::info!(session = %session.id, score = session.score, "game failed");
            return GameSettlement { success, coins: 0, experience: 0 };
        }

        let (coins, experience) = Self::reward_for(definition, session.score);
        sink.credit_coins(coins);
        sink.credit_experience(experience);
        tracing::info!(session = %session.id, score = session.score, coins, "game won");
        GameSettlement { success, coins, experience }
    }
}
