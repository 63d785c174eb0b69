//! Per-round game data and its generators
//!
//! A payload is everything the player needs to see for the current round
//! plus the progress made on it so far. The next round's payload is
//! generated when a round is cleared.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::minigame::GameType;

pub const MEMORY_SYMBOLS: [&str; 10] = ["🍎", "🍌", "🍇", "🍓", "🥝", "🍑", "🍊", "🥭", "🍍", "🥥"];
const MEMORY_START_LENGTH: usize = 3;

const PUZZLE_IMAGES: [&str; 7] = [
    "cat_sleeping",
    "dog_playing",
    "rabbit_eating",
    "hamster_running",
    "dragon_flying",
    "panda_bamboo",
    "penguin_swimming",
];

const BOARD_SIZE: i32 = 300;
pub const SPOT_DIFFERENCES: usize = 5;
pub const REACTION_CLICKS: u32 = 10;
const REACTION_TARGETS: usize = 8;
const GOOD_TARGETS: [&str; 8] = ["🎯", "⭐", "💎", "🏆", "🎪", "🍭", "🎁", "🌟"];
const BAD_TARGETS: [&str; 8] = ["💥", "🌪️", "⚡", "🔥", "❌", "💀", "🕷️", "🐍"];

const WHACK_HOLES: u32 = 9;
const DANCE_MOVES: [&str; 8] = ["sway_left", "sway_right", "jump", "spin", "nod", "wag", "stretch", "hop"];
const SONGS: [&str; 4] = ["happy_song", "relaxing_melody", "energetic_tune", "gentle_lullaby"];
const CARE_TASKS: [&str; 5] = ["feed", "clean", "play", "heal", "groom"];
pub const TREASURE_ROOMS: [&str; 5] = ["living_room", "bedroom", "kitchen", "bathroom", "garden"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRound {
    pub sequence: Vec<String>,
    pub entered: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRound {
    pub image: String,
    pub grid_size: u32,
    /// Piece ids in the order they are handed out; piece `i` belongs in cell `i`
    pub pieces: Vec<u32>,
    pub placed: Vec<bool>,
    pub mistakes: u32,
}

impl PuzzleRound {
    pub fn piece_count(&self) -> u32 {
        self.grid_size * self.grid_size
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotDifferenceRound {
    pub differences: Vec<Difference>,
    pub misses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionTarget {
    pub id: u32,
    pub icon: String,
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRound {
    pub targets: Vec<ReactionTarget>,
    pub clicks: u32,
    pub correct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingTarget {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub points: i32,
    pub hit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingRound {
    pub targets: Vec<ShootingTarget>,
    pub ammo: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoleKind {
    Normal,
    Golden,
    Trap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolePop {
    pub hole: u32,
    pub kind: MoleKind,
    pub whacked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhackRound {
    pub pops: Vec<MolePop>,
}

impl WhackRound {
    pub fn moles(&self) -> usize {
        self.pops.iter().filter(|p| p.kind != MoleKind::Trap).count()
    }

    pub fn hits(&self) -> usize {
        self.pops
            .iter()
            .filter(|p| p.kind != MoleKind::Trap && p.whacked)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatJudgement {
    Perfect,
    Good,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatCue {
    pub time_ms: u32,
    /// Dance move or drum name
    pub cue: String,
    pub judged: Option<BeatJudgement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatRound {
    pub bpm: u32,
    pub beats: Vec<BeatCue>,
    pub perfect_window_ms: i32,
    pub good_window_ms: i32,
}

impl BeatRound {
    pub fn count(&self, judgement: BeatJudgement) -> usize {
        self.beats.iter().filter(|b| b.judged == Some(judgement)).count()
    }

    /// Share of beats hit perfect or good
    pub fn accuracy(&self) -> f64 {
        if self.beats.is_empty() {
            return 0.0;
        }
        let hits = self.count(BeatJudgement::Perfect) + self.count(BeatJudgement::Good);
        hits as f64 / self.beats.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingingRound {
    pub song: String,
    pub phrases: u32,
    pub scores: Vec<f64>,
}

impl SingingRound {
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTask {
    pub name: String,
    pub target: u32,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareRound {
    pub tasks: Vec<CareTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    pub room: String,
    pub value: i32,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureRound {
    pub rooms: Vec<String>,
    pub treasures: Vec<Treasure>,
    pub wrong_guesses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TapRound {
    pub taps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GamePayload {
    Memory(MemoryRound),
    Puzzle(PuzzleRound),
    SpotDifference(SpotDifferenceRound),
    Reaction(ReactionRound),
    Shooting(ShootingRound),
    Whack(WhackRound),
    Beats(BeatRound),
    Singing(SingingRound),
    Care(CareRound),
    Treasure(TreasureRound),
    Tap(TapRound),
}

impl GamePayload {
    /// Build the payload for `round` (1-based)
    pub fn generate<R: Rng + ?Sized>(game: GameType, round: u32, rng: &mut R) -> Self {
        let round = round.max(1);
        match game {
            GameType::Memory => GamePayload::Memory(memory(round, rng)),
            GameType::Puzzle => GamePayload::Puzzle(puzzle(round, rng)),
            GameType::SpotDifference => GamePayload::SpotDifference(spot_difference(rng)),
            GameType::Reaction => GamePayload::Reaction(reaction(rng)),
            GameType::PrecisionShooting => GamePayload::Shooting(shooting(round, rng)),
            GameType::WhackMole => GamePayload::Whack(whack(round, rng)),
            GameType::MusicDance => GamePayload::Beats(dance(rng)),
            GameType::DrumGame => GamePayload::Beats(drums(rng)),
            GameType::SingingContest => GamePayload::Singing(singing(rng)),
            GameType::PetCareChallenge => GamePayload::Care(care(rng)),
            GameType::TreasureHunt => GamePayload::Treasure(treasure(rng)),
            GameType::Tap => GamePayload::Tap(TapRound::default()),
        }
    }
}

fn memory<R: Rng + ?Sized>(round: u32, rng: &mut R) -> MemoryRound {
    let length = MEMORY_START_LENGTH + (round as usize - 1);
    let sequence = (0..length)
        .map(|_| MEMORY_SYMBOLS[rng.gen_range(0..MEMORY_SYMBOLS.len())].to_string())
        .collect();
    MemoryRound { sequence, entered: Vec::new() }
}

fn puzzle<R: Rng + ?Sized>(round: u32, rng: &mut R) -> PuzzleRound {
    let grid_size = (round + 2).min(5);
    let mut pieces: Vec<u32> = (0..grid_size * grid_size).collect();
    pieces.shuffle(rng);
    PuzzleRound {
        image: PUZZLE_IMAGES[rng.gen_range(0..PUZZLE_IMAGES.len())].to_string(),
        grid_size,
        placed: vec![false; pieces.len()],
        pieces,
        mistakes: 0,
    }
}

fn spot_difference<R: Rng + ?Sized>(rng: &mut R) -> SpotDifferenceRound {
    let differences = (0..SPOT_DIFFERENCES)
        .map(|_| Difference {
            x: rng.gen_range(25..BOARD_SIZE - 25),
            y: rng.gen_range(25..BOARD_SIZE - 25),
            radius: rng.gen_range(10..30),
            found: false,
        })
        .collect();
    SpotDifferenceRound { differences, misses: 0 }
}

fn reaction<R: Rng + ?Sized>(rng: &mut R) -> ReactionRound {
    let mut targets: Vec<ReactionTarget> = (0..REACTION_TARGETS as u32)
        .map(|id| {
            let is_target = rng.gen_bool(0.7);
            let pool = if is_target { &GOOD_TARGETS } else { &BAD_TARGETS };
            ReactionTarget {
                id,
                icon: pool[rng.gen_range(0..pool.len())].to_string(),
                is_target,
            }
        })
        .collect();
    // Always leave something worth clicking
    if !targets.iter().any(|t| t.is_target) {
        targets[0].is_target = true;
        targets[0].icon = GOOD_TARGETS[0].to_string();
    }
    ReactionRound { targets, clicks: 0, correct: 0 }
}

fn shooting<R: Rng + ?Sized>(round: u32, rng: &mut R) -> ShootingRound {
    let targets = (0..3 + round)
        .map(|_| {
            let radius = rng.gen_range(15..25);
            ShootingTarget {
                x: rng.gen_range(50..250),
                y: rng.gen_range(30..130),
                radius,
                // smaller targets pay more
                points: 100 / (radius * 2),
                hit: false,
            }
        })
        .collect();
    ShootingRound { targets, ammo: 10 + 2 * round }
}

fn whack<R: Rng + ?Sized>(round: u32, rng: &mut R) -> WhackRound {
    let count = 10 + 2 * round;
    let pops = (0..count)
        .map(|i| {
            let roll: f64 = rng.gen();
            let kind = if i == 0 || roll >= 0.3 {
                MoleKind::Normal
            } else if roll < 0.1 {
                MoleKind::Golden
            } else {
                MoleKind::Trap
            };
            MolePop {
                hole: rng.gen_range(0..WHACK_HOLES),
                kind,
                whacked: false,
            }
        })
        .collect();
    WhackRound { pops }
}

fn beat_round(bpm: u32, beats: Vec<BeatCue>) -> BeatRound {
    let interval = (60_000 / bpm.max(1)) as i32;
    BeatRound {
        bpm,
        beats,
        perfect_window_ms: interval / 4,
        good_window_ms: interval / 2,
    }
}

fn dance<R: Rng + ?Sized>(rng: &mut R) -> BeatRound {
    let bpm = 120;
    let interval = 60_000 / bpm;
    let mut beats = Vec::new();
    for i in 0..32u32 {
        if rng.gen_bool(0.7) {
            beats.push(BeatCue {
                time_ms: i * interval,
                cue: DANCE_MOVES[rng.gen_range(0..DANCE_MOVES.len())].to_string(),
                judged: None,
            });
        }
    }
    if beats.is_empty() {
        beats.push(BeatCue { time_ms: 0, cue: DANCE_MOVES[0].to_string(), judged: None });
    }
    beat_round(bpm, beats)
}

fn drums<R: Rng + ?Sized>(rng: &mut R) -> BeatRound {
    let mut beats = Vec::new();
    for i in 0..16u32 {
        if rng.gen_bool(0.6) {
            let drum = if rng.gen_bool(0.5) { "kick" } else { "snare" };
            beats.push(BeatCue { time_ms: i * 500, cue: drum.to_string(), judged: None });
        }
    }
    if beats.is_empty() {
        beats.push(BeatCue { time_ms: 0, cue: "kick".to_string(), judged: None });
    }
    beat_round(120, beats)
}

fn singing<R: Rng + ?Sized>(rng: &mut R) -> SingingRound {
    SingingRound {
        song: SONGS[rng.gen_range(0..SONGS.len())].to_string(),
        phrases: rng.gen_range(4..=6),
        scores: Vec::new(),
    }
}

fn care<R: Rng + ?Sized>(rng: &mut R) -> CareRound {
    let count = rng.gen_range(3..=5);
    let tasks = (0..count)
        .map(|_| CareTask {
            name: CARE_TASKS[rng.gen_range(0..CARE_TASKS.len())].to_string(),
            target: rng.gen_range(80..100),
            done: false,
        })
        .collect();
    CareRound { tasks }
}

fn treasure<R: Rng + ?Sized>(rng: &mut R) -> TreasureRound {
    let rooms: Vec<String> = TREASURE_ROOMS.iter().map(|r| r.to_string()).collect();
    let hiding: Vec<&str> = TREASURE_ROOMS.choose_multiple(rng, 3).copied().collect();
    let treasures = hiding
        .into_iter()
        .enumerate()
        .map(|(i, room)| Treasure {
            room: room.to_string(),
            value: (i as i32 + 1) * 10,
            found: false,
        })
        .collect();
    TreasureRound { rooms, treasures, wrong_guesses: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_memory_grows_each_round() {
        let mut rng = rng();
        for round in 1..=3 {
            match GamePayload::generate(GameType::Memory, round, &mut rng) {
                GamePayload::Memory(m) => {
                    assert_eq!(m.sequence.len(), 2 + round as usize);
                    assert!(m.sequence.iter().all(|s| MEMORY_SYMBOLS.contains(&s.as_str())));
                }
                other => panic!("unexpected payload {:?}", other),
            }
        }
    }

    #[test]
    fn test_puzzle_grid_sizes() {
        let mut rng = rng();
        let sizes: Vec<u32> = (1..=4)
            .map(|round| match GamePayload::generate(GameType::Puzzle, round, &mut rng) {
                GamePayload::Puzzle(p) => p.grid_size,
                _ => 0,
            })
            .collect();
        assert_eq!(sizes, vec![3, 4, 5, 5]);
    }

    #[test]
    fn test_puzzle_pieces_are_a_permutation() {
        let GamePayload::Puzzle(p) = GamePayload::generate(GameType::Puzzle, 2, &mut rng()) else {
            panic!("expected puzzle");
        };
        let mut pieces = p.pieces.clone();
        pieces.sort_unstable();
        assert_eq!(pieces, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_shooting_scales_with_round() {
        let GamePayload::Shooting(s) = GamePayload::generate(GameType::PrecisionShooting, 2, &mut rng()) else {
            panic!("expected shooting");
        };
        assert_eq!(s.targets.len(), 5);
        assert_eq!(s.ammo, 14);
    }

    #[test]
    fn test_treasures_in_distinct_rooms() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let GamePayload::Treasure(t) = GamePayload::generate(GameType::TreasureHunt, 1, &mut rng) else {
                panic!("expected treasure");
            };
            let mut rooms: Vec<_> = t.treasures.iter().map(|t| t.room.clone()).collect();
            rooms.sort();
            rooms.dedup();
            assert_eq!(rooms.len(), 3);
        }
    }

    #[test]
    fn test_generated_rounds_are_playable() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            if let GamePayload::Whack(w) = GamePayload::generate(GameType::WhackMole, 1, &mut rng) {
                assert!(w.moles() > 0);
            }
            if let GamePayload::Reaction(r) = GamePayload::generate(GameType::Reaction, 1, &mut rng) {
                assert!(r.targets.iter().any(|t| t.is_target));
            }
            if let GamePayload::Beats(b) = GamePayload::generate(GameType::DrumGame, 1, &mut rng) {
                assert!(!b.beats.is_empty());
            }
        }
    }
}
