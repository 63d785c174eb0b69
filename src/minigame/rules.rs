//! Per-game input handling
//!
//! A handler checks one input against the current round payload, records the
//! move in the payload and reports how the round stands. It never touches the
//! session state machine; the manager does that from the returned step.

use crate::core::error::{PetError, Result};
use crate::minigame::input::GameInput;
use crate::minigame::payload::{
    BeatJudgement, BeatRound, CareRound, GamePayload, MemoryRound, MoleKind, PuzzleRound,
    ReactionRound, ShootingRound, SingingRound, SpotDifferenceRound, TapRound, TreasureRound,
    WhackRound, MEMORY_SYMBOLS, REACTION_CLICKS,
};

pub const REACTION_ACCURACY: f64 = 0.7;
pub const BEAT_ACCURACY: f64 = 0.6;
pub const SINGING_AVERAGE: f64 = 0.6;
pub const SPOT_MAX_MISSES: u32 = 3;
pub const TREASURE_MAX_WRONG: u32 = 5;
pub const TAP_TARGET: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Round still in progress
    Open,
    Cleared,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboChange {
    Keep,
    Extend(u32),
    Break,
}

/// Result of one handled input
#[derive(Debug, Clone, PartialEq)]
pub struct RoundStep {
    pub points: i32,
    pub combo: ComboChange,
    pub status: RoundStatus,
    pub message: String,
}

impl RoundStep {
    fn open(points: i32, combo: ComboChange, message: impl Into<String>) -> Self {
        Self { points, combo, status: RoundStatus::Open, message: message.into() }
    }

    fn cleared(points: i32, combo: ComboChange, message: impl Into<String>) -> Self {
        Self { points, combo, status: RoundStatus::Cleared, message: message.into() }
    }

    fn failed(points: i32, message: impl Into<String>) -> Self {
        Self { points, combo: ComboChange::Break, status: RoundStatus::Failed, message: message.into() }
    }
}

/// Whether `(x, y)` lands inside the circle at `(cx, cy)`. Computed in i64
/// so any caller coordinates are safe.
fn within(cx: i32, cy: i32, radius: i32, x: i32, y: i32) -> bool {
    let radius = i64::from(radius);
    let dx = i64::from(cx) - i64::from(x);
    let dy = i64::from(cy) - i64::from(y);
    dx.abs() <= radius && dy.abs() <= radius && dx * dx + dy * dy <= radius * radius
}

fn wrong_input(game: &str, input: &GameInput) -> PetError {
    PetError::invalid_input(format!("{} does not accept '{}' input", game, input.kind()))
}

/// Apply `input` to `payload`. `combo` is the session's current streak.
pub fn handle(payload: &mut GamePayload, input: &GameInput, combo: u32) -> Result<RoundStep> {
    match payload {
        GamePayload::Memory(round) => memory(round, input),
        GamePayload::Puzzle(round) => puzzle(round, input),
        GamePayload::SpotDifference(round) => spot_difference(round, input),
        GamePayload::Reaction(round) => reaction(round, input),
        GamePayload::Shooting(round) => shooting(round, input),
        GamePayload::Whack(round) => whack(round, input),
        GamePayload::Beats(round) => beats(round, input),
        GamePayload::Singing(round) => singing(round, input),
        GamePayload::Care(round) => care(round, input),
        GamePayload::Treasure(round) => treasure(round, input),
        GamePayload::Tap(round) => tap(round, input, combo),
    }
}

fn memory(round: &mut MemoryRound, input: &GameInput) -> Result<RoundStep> {
    let symbol = match input {
        GameInput::Select { symbol } => symbol,
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("memory", other)),
    };
    if !MEMORY_SYMBOLS.contains(&symbol.as_str()) {
        return Err(PetError::invalid_input(format!("unknown symbol '{}'", symbol)));
    }
    let position = round.entered.len();
    let Some(expected) = round.sequence.get(position) else {
        return Err(PetError::invalid_input("sequence already complete"));
    };

    if symbol != expected {
        return Ok(RoundStep::failed(
            0,
            format!("Wrong! The sequence was {}", round.sequence.join(" ")),
        ));
    }

    round.entered.push(symbol.clone());
    if round.entered.len() == round.sequence.len() {
        let points = 10 * round.sequence.len() as i32;
        return Ok(RoundStep::cleared(points, ComboChange::Extend(1), "Sequence complete!"));
    }
    Ok(RoundStep::open(0, ComboChange::Keep, "Keep going..."))
}

fn puzzle(round: &mut PuzzleRound, input: &GameInput) -> Result<RoundStep> {
    let (piece, cell) = match input {
        GameInput::Place { piece, cell } => (*piece, *cell),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("puzzle", other)),
    };
    let count = round.piece_count();
    if piece >= count || cell >= count {
        return Err(PetError::invalid_input(format!(
            "piece and cell must be below {}",
            count
        )));
    }
    if round.placed[piece as usize] {
        return Err(PetError::invalid_input(format!("piece {} is already placed", piece)));
    }

    if piece != cell {
        round.mistakes += 1;
        if round.mistakes > count / 2 {
            return Ok(RoundStep::failed(0, "Too many wrong placements"));
        }
        return Ok(RoundStep::open(0, ComboChange::Break, "That piece doesn't fit there"));
    }

    round.placed[piece as usize] = true;
    if round.placed.iter().all(|p| *p) {
        return Ok(RoundStep::cleared(2 + 15, ComboChange::Extend(1), "Puzzle complete!"));
    }
    Ok(RoundStep::open(2, ComboChange::Extend(1), "Nice fit!"))
}

fn spot_difference(round: &mut SpotDifferenceRound, input: &GameInput) -> Result<RoundStep> {
    let (x, y) = match input {
        GameInput::Point { x, y } => (*x, *y),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("spot the difference", other)),
    };

    let hit = round
        .differences
        .iter_mut()
        .find(|d| !d.found && within(d.x, d.y, d.radius, x, y));

    match hit {
        Some(difference) => {
            difference.found = true;
            if round.differences.iter().all(|d| d.found) {
                Ok(RoundStep::cleared(10, ComboChange::Extend(1), "Found them all!"))
            } else {
                Ok(RoundStep::open(10, ComboChange::Extend(1), "Found one!"))
            }
        }
        None => {
            round.misses += 1;
            if round.misses >= SPOT_MAX_MISSES {
                Ok(RoundStep::failed(0, "Too many misses"))
            } else {
                Ok(RoundStep::open(0, ComboChange::Break, "Nothing different there"))
            }
        }
    }
}

fn reaction(round: &mut ReactionRound, input: &GameInput) -> Result<RoundStep> {
    let target_id = match input {
        GameInput::Click { target } => *target,
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("reaction", other)),
    };
    let target = round
        .targets
        .iter()
        .find(|t| t.id == target_id)
        .ok_or_else(|| PetError::invalid_input(format!("no target {}", target_id)))?;

    round.clicks += 1;
    let (points, combo) = if target.is_target {
        round.correct += 1;
        (5, ComboChange::Extend(1))
    } else {
        (-2, ComboChange::Break)
    };

    if round.clicks < REACTION_CLICKS {
        return Ok(RoundStep::open(points, combo, "Keep clicking targets!"));
    }

    let accuracy = round.correct as f64 / round.clicks as f64;
    let message = format!("Accuracy {:.1}%", accuracy * 100.0);
    if accuracy >= REACTION_ACCURACY {
        Ok(RoundStep::cleared(points, combo, message))
    } else {
        Ok(RoundStep::failed(points, format!("{} (need 70%)", message)))
    }
}

fn shooting(round: &mut ShootingRound, input: &GameInput) -> Result<RoundStep> {
    let (x, y) = match input {
        GameInput::Point { x, y } => (*x, *y),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("precision shooting", other)),
    };
    if round.ammo == 0 {
        return Ok(RoundStep::failed(0, "Out of ammo"));
    }
    round.ammo -= 1;

    let hit = round
        .targets
        .iter_mut()
        .find(|t| !t.hit && within(t.x, t.y, t.radius, x, y));

    let (points, combo) = match hit {
        Some(target) => {
            target.hit = true;
            (target.points, ComboChange::Extend(1))
        }
        None => (0, ComboChange::Break),
    };

    if round.targets.iter().all(|t| t.hit) {
        return Ok(RoundStep::cleared(points, combo, "All targets down!"));
    }
    if round.ammo == 0 {
        return Ok(RoundStep::failed(points, "Out of ammo"));
    }
    let message = if points > 0 { "Hit!" } else { "Missed" };
    Ok(RoundStep::open(points, combo, message))
}

fn whack(round: &mut WhackRound, input: &GameInput) -> Result<RoundStep> {
    let index = match input {
        GameInput::Whack { pop } => *pop as usize,
        GameInput::TimeUp => {
            // Half the moles is enough when the clock runs out
            let needed = round.moles().div_ceil(2);
            return if round.hits() >= needed {
                Ok(RoundStep::cleared(0, ComboChange::Keep, "Time's up, nice whacking!"))
            } else {
                Ok(RoundStep::failed(0, "Time's up, too many got away"))
            };
        }
        other => return Err(wrong_input("whack-a-mole", other)),
    };
    let pop = round
        .pops
        .get_mut(index)
        .ok_or_else(|| PetError::invalid_input(format!("no pop {}", index)))?;
    if pop.whacked {
        return Err(PetError::invalid_input(format!("pop {} was already whacked", index)));
    }
    pop.whacked = true;

    let (points, combo) = match pop.kind {
        MoleKind::Normal => (10, ComboChange::Extend(1)),
        MoleKind::Golden => (30, ComboChange::Extend(1)),
        MoleKind::Trap => (-15, ComboChange::Break),
    };

    if round.hits() == round.moles() {
        return Ok(RoundStep::cleared(points, combo, "Every mole whacked!"));
    }
    let message = if points < 0 { "Ouch, a trap!" } else { "Whack!" };
    Ok(RoundStep::open(points, combo, message))
}

fn judge(round: &BeatRound, offset_ms: i32) -> BeatJudgement {
    let offset = offset_ms.unsigned_abs();
    if offset <= round.perfect_window_ms.unsigned_abs() {
        BeatJudgement::Perfect
    } else if offset <= round.good_window_ms.unsigned_abs() {
        BeatJudgement::Good
    } else {
        BeatJudgement::Miss
    }
}

fn beats(round: &mut BeatRound, input: &GameInput) -> Result<RoundStep> {
    let (points, combo, judgement) = match input {
        GameInput::Beat { beat, offset_ms } => {
            let index = *beat as usize;
            let judgement = judge(round, *offset_ms);
            let cue = round
                .beats
                .get_mut(index)
                .ok_or_else(|| PetError::invalid_input(format!("no beat {}", index)))?;
            if cue.judged.is_some() {
                return Err(PetError::invalid_input(format!("beat {} was already played", index)));
            }
            cue.judged = Some(judgement);
            match judgement {
                BeatJudgement::Perfect => (10, ComboChange::Extend(1), Some(judgement)),
                BeatJudgement::Good => (5, ComboChange::Extend(1), Some(judgement)),
                BeatJudgement::Miss => (0, ComboChange::Break, Some(judgement)),
            }
        }
        GameInput::TimeUp => {
            for cue in round.beats.iter_mut().filter(|b| b.judged.is_none()) {
                cue.judged = Some(BeatJudgement::Miss);
            }
            (0, ComboChange::Keep, None)
        }
        other => return Err(wrong_input("rhythm game", other)),
    };

    if round.beats.iter().any(|b| b.judged.is_none()) {
        let message = match judgement {
            Some(BeatJudgement::Perfect) => "Perfect!",
            Some(BeatJudgement::Good) => "Good",
            _ => "Miss",
        };
        return Ok(RoundStep::open(points, combo, message));
    }

    let accuracy = round.accuracy();
    let message = format!("Accuracy {:.1}%", accuracy * 100.0);
    if accuracy >= BEAT_ACCURACY {
        Ok(RoundStep::cleared(points, combo, message))
    } else {
        Ok(RoundStep::failed(points, message))
    }
}

fn singing(round: &mut SingingRound, input: &GameInput) -> Result<RoundStep> {
    let (pitch, rhythm) = match input {
        GameInput::Phrase { pitch, rhythm } => (*pitch, *rhythm),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "The song ended")),
        other => return Err(wrong_input("singing contest", other)),
    };
    if !(0.0..=1.0).contains(&pitch) || !(0.0..=1.0).contains(&rhythm) {
        return Err(PetError::invalid_input("pitch and rhythm must be within 0.0..=1.0"));
    }

    let phrase = (pitch + rhythm) / 2.0;
    round.scores.push(phrase);
    let points = (phrase * 20.0).round() as i32;
    let combo = if phrase >= SINGING_AVERAGE { ComboChange::Extend(1) } else { ComboChange::Break };

    if (round.scores.len() as u32) < round.phrases {
        return Ok(RoundStep::open(points, combo, format!("Phrase score {:.0}%", phrase * 100.0)));
    }

    let average = round.average();
    let message = format!("Average {:.0}%", average * 100.0);
    if average >= SINGING_AVERAGE {
        Ok(RoundStep::cleared(points, combo, message))
    } else {
        Ok(RoundStep::failed(points, message))
    }
}

fn care(round: &mut CareRound, input: &GameInput) -> Result<RoundStep> {
    let (index, value) = match input {
        GameInput::Care { task, value } => (*task as usize, *value),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("pet care challenge", other)),
    };
    let task = round
        .tasks
        .get_mut(index)
        .ok_or_else(|| PetError::invalid_input(format!("no task {}", index)))?;
    if task.done {
        return Err(PetError::invalid_input(format!("task {} is already done", index)));
    }

    if value < task.target {
        let message = format!("Not quite, {} needs {}", task.name, task.target);
        return Ok(RoundStep::open(0, ComboChange::Break, message));
    }
    task.done = true;

    if round.tasks.iter().all(|t| t.done) {
        return Ok(RoundStep::cleared(10, ComboChange::Extend(1), "All tasks done!"));
    }
    Ok(RoundStep::open(10, ComboChange::Extend(1), "Task done!"))
}

fn treasure(round: &mut TreasureRound, input: &GameInput) -> Result<RoundStep> {
    let room = match input {
        GameInput::Search { room } => room.trim().to_lowercase(),
        GameInput::TimeUp => return Ok(RoundStep::failed(0, "Time's up!")),
        other => return Err(wrong_input("treasure hunt", other)),
    };
    if !round.rooms.iter().any(|r| *r == room) {
        return Err(PetError::invalid_input(format!("no room called '{}'", room)));
    }

    match round.treasures.iter_mut().find(|t| !t.found && t.room == room) {
        Some(treasure) => {
            treasure.found = true;
            let value = treasure.value;
            if round.treasures.iter().all(|t| t.found) {
                Ok(RoundStep::cleared(value, ComboChange::Extend(1), "Found every treasure!"))
            } else {
                Ok(RoundStep::open(value, ComboChange::Extend(1), format!("Treasure in the {}!", room)))
            }
        }
        None => {
            round.wrong_guesses += 1;
            if round.wrong_guesses >= TREASURE_MAX_WRONG {
                Ok(RoundStep::failed(0, "Too many empty searches"))
            } else {
                Ok(RoundStep::open(0, ComboChange::Break, format!("Nothing in the {}", room)))
            }
        }
    }
}

fn tap(round: &mut TapRound, input: &GameInput, combo: u32) -> Result<RoundStep> {
    let count = match input {
        GameInput::Taps { count } => *count,
        GameInput::TimeUp => {
            return if round.taps > 0 {
                Ok(RoundStep::cleared(0, ComboChange::Keep, format!("{} taps!", round.taps)))
            } else {
                Ok(RoundStep::failed(0, "No taps at all"))
            };
        }
        other => return Err(wrong_input("tap", other)),
    };
    if count == 0 {
        return Err(PetError::invalid_input("tap count must be positive"));
    }

    let count = count.min(TAP_TARGET - round.taps);
    // Every 20 taps in a row adds one to the multiplier, up to x3
    let multiplier = 1 + (combo / 20).min(2);
    round.taps += count;
    let points = (count * multiplier) as i32;

    if round.taps >= TAP_TARGET {
        return Ok(RoundStep::cleared(points, ComboChange::Extend(count), format!("{} taps!", round.taps)));
    }
    Ok(RoundStep::open(points, ComboChange::Extend(count), format!("x{} combo", multiplier)))
}
