//! Integration tests for mini-game sessions
//!
//! These tests play complete games through `PetEngine`:
//! - Multi-round progression and the state history it leaves behind
//! - Settlement into the ledger and the primary pet's experience
//! - Pause/resume, terminal sessions, one active session per player
//! - Sessions abandoned when their pet goes away

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use pet_haven::catalog::Catalog;
use pet_haven::core::clock::ManualClock;
use pet_haven::core::config::EngineConfig;
use pet_haven::core::types::{PetType, PlayerId};
use pet_haven::minigame::payload::{MemoryRound, TreasureRound, TREASURE_ROOMS};
use pet_haven::minigame::{GameInput, GamePayload, GameState, GameType, MiniGameSession};
use pet_haven::{PetEngine, PetError};

fn setup() -> (PetEngine, PlayerId, pet_haven::pet::Pet) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    ));
    let engine = PetEngine::new(
        EngineConfig::seeded(2024),
        Arc::new(Catalog::embedded().unwrap()),
        clock,
    )
    .unwrap();
    let player = PlayerId::new("kai");
    let pet = engine
        .create_pet(&player, "Pebble", PetType::Penguin, serde_json::Value::Null)
        .unwrap();
    (engine, player, pet)
}

fn memory_sequence(session: &MiniGameSession) -> Vec<String> {
    match &session.payload {
        GamePayload::Memory(MemoryRound { sequence, .. }) => sequence.clone(),
        other => panic!("expected a memory round, got {:?}", other),
    }
}

fn unlocked_coins(engine: &PetEngine, player: &PlayerId) -> u32 {
    engine
        .get_achievements(player)
        .iter()
        .filter(|s| s.progress.unlocked)
        .map(|s| s.definition.reward.coins)
        .sum()
}

// ============================================================================
// Full games
// ============================================================================

/// Three memory rounds cleared in a row:
/// 1. Each round's sequence is one longer than the last (3, 4, 5)
/// 2. History walks Preparing -> Playing -> RoundComplete ... -> GameComplete
/// 3. Score 120 pays min(25, 2 * 12) = 24 coins and 12 experience
#[test]
fn test_three_round_memory_game() {
    let (engine, player, pet) = setup();
    let mut session = engine.start_minigame(&player, GameType::Memory).unwrap();
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.pet, pet.id);

    let mut lengths = Vec::new();
    let mut last_turn = None;
    while !session.is_terminal() {
        let sequence = memory_sequence(&session);
        lengths.push(sequence.len());
        for symbol in sequence {
            let turn = engine
                .submit_game_input(session.id, &GameInput::Select { symbol })
                .unwrap();
            session = turn.session.clone();
            last_turn = Some(turn);
        }
    }

    assert_eq!(lengths, vec![3, 4, 5]);
    assert_eq!(session.score, 120);
    assert_eq!(
        session.history(),
        &[
            GameState::Preparing,
            GameState::Playing,
            GameState::RoundComplete,
            GameState::Playing,
            GameState::RoundComplete,
            GameState::Playing,
            GameState::RoundComplete,
            GameState::GameComplete,
        ]
    );
    assert!(session.ended_at.is_some());

    let turn = last_turn.unwrap();
    let settlement = turn.settlement.unwrap();
    assert!(settlement.success);
    assert_eq!(settlement.coins, 24);
    assert_eq!(settlement.experience, 12);
    assert!(turn.newly_unlocked.iter().any(|a| a.id == "first_game_win"));

    let ledger = engine.get_ledger(&player);
    assert_eq!(ledger.coins, 100 + 24 + unlocked_coins(&engine, &player));

    let counters = engine.player_counters(&player);
    assert_eq!(counters.games_played, 1);
    assert_eq!(counters.games_won, 1);

    let first_win_xp = turn
        .newly_unlocked
        .iter()
        .find(|a| a.id == "first_game_win")
        .map(|a| a.reward.experience)
        .unwrap();
    let pet = engine.get_pet(pet.id).unwrap();
    assert_eq!(pet.stats.experience(), 12 + first_win_xp);
}

/// A wrong symbol fails the game and pays nothing
#[test]
fn test_failed_game_pays_nothing() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::Memory).unwrap();
    let expected = memory_sequence(&session)[0].clone();
    let wrong = pet_haven::minigame::payload::MEMORY_SYMBOLS
        .iter()
        .find(|s| **s != expected)
        .unwrap()
        .to_string();

    let turn = engine
        .submit_game_input(session.id, &GameInput::Select { symbol: wrong })
        .unwrap();
    assert_eq!(turn.outcome.finished, Some(false));
    assert_eq!(turn.session.state(), GameState::Failed);
    assert_eq!(turn.settlement.map(|s| s.success), Some(false));
    assert_eq!(engine.get_ledger(&player).coins, 100);
    assert_eq!(engine.player_counters(&player).games_won, 0);
}

/// Searching every room finds all three treasures
#[test]
fn test_treasure_hunt_until_found() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::TreasureHunt).unwrap();
    let hidden: Vec<String> = match &session.payload {
        GamePayload::Treasure(TreasureRound { treasures, .. }) => {
            treasures.iter().map(|t| t.room.clone()).collect()
        }
        other => panic!("expected a treasure round, got {:?}", other),
    };
    let empty = TREASURE_ROOMS
        .iter()
        .find(|r| !hidden.iter().any(|h| h == *r))
        .unwrap();

    let miss = engine
        .submit_game_input(session.id, &GameInput::Search { room: empty.to_string() })
        .unwrap();
    assert_eq!(miss.outcome.points, 0);
    assert_eq!(miss.session.combo, 0);

    let mut turn = None;
    for room in &hidden {
        turn = Some(
            engine
                .submit_game_input(session.id, &GameInput::Search { room: room.clone() })
                .unwrap(),
        );
    }
    let turn = turn.unwrap();
    assert_eq!(turn.session.state(), GameState::GameComplete);
    assert_eq!(turn.session.score, 60);
    assert_eq!(turn.session.best_combo, 3);
}

/// A singing contest waits for input instead of playing
#[test]
fn test_singing_contest_waits_for_input() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::SingingContest).unwrap();
    assert_eq!(session.state(), GameState::WaitingInput);

    let mut state = session.state();
    let mut finished = None;
    while finished.is_none() {
        let turn = engine
            .submit_game_input(session.id, &GameInput::Phrase { pitch: 0.9, rhythm: 0.8 })
            .unwrap();
        finished = turn.outcome.finished;
        state = turn.session.state();
        if finished.is_none() {
            assert_eq!(state, GameState::WaitingInput);
        }
    }
    assert_eq!(finished, Some(true));
    assert_eq!(state, GameState::GameComplete);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[test]
fn test_pause_blocks_input_until_resumed() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::Tap).unwrap();

    let paused = engine.pause_game(session.id).unwrap();
    assert_eq!(paused.state(), GameState::Paused);
    assert!(matches!(
        engine.submit_game_input(session.id, &GameInput::Taps { count: 5 }),
        Err(PetError::PreconditionFailed(_))
    ));
    assert!(matches!(
        engine.pause_game(session.id),
        Err(PetError::PreconditionFailed(_))
    ));

    let resumed = engine.resume_game(session.id).unwrap();
    assert_eq!(resumed.state(), GameState::Playing);
    let turn = engine
        .submit_game_input(session.id, &GameInput::Taps { count: 5 })
        .unwrap();
    assert_eq!(turn.outcome.points, 5);
}

/// Finished sessions are closed: later input finds nothing and the player
/// is free to start a new game
#[test]
fn test_finished_session_is_closed() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::WhackMole).unwrap();
    assert!(matches!(
        engine.start_minigame(&player, GameType::Tap),
        Err(PetError::PreconditionFailed(_))
    ));

    // Nothing whacked when the clock runs out
    let turn = engine.submit_game_input(session.id, &GameInput::TimeUp).unwrap();
    assert_eq!(turn.session.state(), GameState::Failed);
    assert_eq!(turn.session.id, session.id);

    assert!(matches!(
        engine.submit_game_input(session.id, &GameInput::TimeUp),
        Err(PetError::NotFound { kind: "session", .. })
    ));
    assert!(matches!(
        engine.pause_game(session.id),
        Err(PetError::NotFound { kind: "session", .. })
    ));
    assert!(matches!(
        engine.session(session.id),
        Err(PetError::NotFound { kind: "session", .. })
    ));
    assert!(engine.active_session(&player).is_none());

    let next = engine.start_minigame(&player, GameType::Tap).unwrap();
    assert_eq!(engine.active_session(&player).map(|s| s.id), Some(next.id));
}

/// A won tap game closes too; a late tap does not pay twice
#[test]
fn test_late_input_after_win_pays_nothing() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::Tap).unwrap();
    engine
        .submit_game_input(session.id, &GameInput::Taps { count: 3 })
        .unwrap();
    let turn = engine.submit_game_input(session.id, &GameInput::TimeUp).unwrap();
    assert_eq!(turn.session.state(), GameState::GameComplete);
    let coins = engine.get_ledger(&player).coins;

    assert!(matches!(
        engine.submit_game_input(session.id, &GameInput::TimeUp),
        Err(PetError::NotFound { kind: "session", .. })
    ));
    assert_eq!(engine.get_ledger(&player).coins, coins);
    assert_eq!(engine.player_counters(&player).games_won, 1);
}

/// Out-of-range coordinates and offsets are ordinary misses
#[test]
fn test_extreme_input_is_a_miss() {
    let (engine, player, _) = setup();
    for game in [GameType::SpotDifference, GameType::PrecisionShooting] {
        let session = engine.start_minigame(&player, game).unwrap();
        let turn = engine
            .submit_game_input(session.id, &GameInput::Point { x: i32::MIN, y: i32::MAX })
            .unwrap();
        assert_eq!(turn.outcome.points, 0);
        if engine.active_session(&player).is_some() {
            engine.submit_game_input(session.id, &GameInput::TimeUp).unwrap();
        }
    }

    let session = engine.start_minigame(&player, GameType::DrumGame).unwrap();
    let turn = engine
        .submit_game_input(session.id, &GameInput::Beat { beat: 0, offset_ms: i32::MIN })
        .unwrap();
    assert_eq!(turn.outcome.points, 0);
}

#[test]
fn test_invalid_input_leaves_session_unchanged() {
    let (engine, player, _) = setup();
    let session = engine.start_minigame(&player, GameType::Memory).unwrap();

    let err = engine
        .submit_game_input(session.id, &GameInput::Taps { count: 3 })
        .unwrap_err();
    assert!(matches!(err, PetError::InvalidInput(_)));
    assert_eq!(engine.session(session.id).unwrap(), session);
}

#[test]
fn test_tired_pet_cannot_play() {
    let (engine, player, pet) = setup();
    for _ in 0..4 {
        engine.execute_action(pet.id, "play").unwrap();
    }
    assert_eq!(engine.get_pet(pet.id).unwrap().stats.energy(), 10);

    let err = engine.start_minigame(&player, GameType::Tap).unwrap_err();
    assert!(matches!(err, PetError::PreconditionFailed(ref r) if r.contains("tired")));
    assert_eq!(engine.player_counters(&player).games_played, 0);
}

/// Deleting the pet a game is bound to abandons the game
#[test]
fn test_deleting_pet_abandons_session() {
    let (engine, player, pet) = setup();
    let backup = engine
        .create_pet(&player, "Flake", PetType::Rabbit, serde_json::Value::Null)
        .unwrap();
    let session = engine.start_minigame(&player, GameType::Tap).unwrap();
    assert_eq!(session.pet, pet.id);

    engine.delete_pet(pet.id).unwrap();
    assert!(engine.active_session(&player).is_none());
    assert!(matches!(
        engine.submit_game_input(session.id, &GameInput::Taps { count: 1 }),
        Err(PetError::NotFound { .. })
    ));

    // The next game binds to the remaining pet
    let next = engine.start_minigame(&player, GameType::Tap).unwrap();
    assert_eq!(next.pet, backup.id);
}

#[test]
fn test_unknown_player_cannot_play() {
    let (engine, _, _) = setup();
    assert!(matches!(
        engine.start_minigame(&PlayerId::new("ghost"), GameType::Tap),
        Err(PetError::NotFound { kind: "player", .. })
    ));
}
