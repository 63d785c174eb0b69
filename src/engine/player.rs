//! Everything one player owns, guarded by a single lock

use rand_chacha::ChaCha8Rng;

use crate::achievements::{AchievementTracker, RewardSink};
use crate::core::types::{PetId, PlayerId};
use crate::ledger::{PlayerCounters, ProgressionLedger};
use crate::minigame::MiniGameSession;
use crate::pet::{Pet, StatModel};

#[derive(Debug)]
pub struct PlayerState {
    pub player: PlayerId,
    /// Creation order; the first entry is the primary pet
    pub pets: Vec<Pet>,
    pub ledger: ProgressionLedger,
    pub achievements: AchievementTracker,
    pub counters: PlayerCounters,
    /// Running session; dropped once it finishes or its pet is deleted
    pub session: Option<MiniGameSession>,
    pub rng: ChaCha8Rng,
}

impl PlayerState {
    pub fn new(player: PlayerId, rng: ChaCha8Rng) -> Self {
        Self {
            player,
            pets: Vec::new(),
            ledger: ProgressionLedger::new(),
            achievements: AchievementTracker::new(),
            counters: PlayerCounters::default(),
            session: None,
            rng,
        }
    }

    pub fn pet_index(&self, pet_id: PetId) -> Option<usize> {
        self.pets.iter().position(|p| p.id == pet_id)
    }

    pub fn pet(&self, pet_id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == pet_id)
    }

    pub fn primary_pet(&self) -> Option<&Pet> {
        self.pets.first()
    }

    pub fn active_session(&self) -> Option<&MiniGameSession> {
        self.session.as_ref().filter(|s| !s.is_terminal())
    }

    /// Forget all progression; used when the last pet is gone
    pub fn reset_progression(&mut self) {
        self.ledger.clear();
        self.achievements.clear();
        self.counters = PlayerCounters::default();
        self.session = None;
    }
}

/// Routes rewards into a player's ledger and, when one is in play, a pet
pub struct PlayerRewards<'a> {
    ledger: &'a mut ProgressionLedger,
    stats: Option<&'a mut StatModel>,
    leveled_up: bool,
}

impl<'a> PlayerRewards<'a> {
    pub fn new(ledger: &'a mut ProgressionLedger, stats: Option<&'a mut StatModel>) -> Self {
        Self { ledger, stats, leveled_up: false }
    }

    /// Whether any experience credited here crossed a level
    pub fn leveled_up(&self) -> bool {
        self.leveled_up
    }
}

impl RewardSink for PlayerRewards<'_> {
    fn credit_coins(&mut self, coins: u32) {
        self.ledger.credit(coins);
    }

    fn credit_experience(&mut self, experience: u32) {
        match self.stats.as_deref_mut() {
            Some(stats) => self.leveled_up |= stats.add_experience(experience),
            None => tracing::debug!(experience, "no pet to receive experience"),
        }
    }

    fn grant_item(&mut self, item_id: &str) {
        self.ledger.add_item(item_id, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rewards_reach_ledger_and_pet() {
        let mut ledger = ProgressionLedger::new();
        let mut stats = StatModel::default().with_experience(90);
        {
            let mut sink = PlayerRewards::new(&mut ledger, Some(&mut stats));
            sink.credit_coins(40);
            sink.credit_experience(20);
            sink.grant_item("crown");
            assert!(sink.leveled_up());
        }
        assert_eq!(ledger.coins(), 40);
        assert_eq!(ledger.quantity("crown"), 1);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_experience_without_pet_is_dropped() {
        let mut ledger = ProgressionLedger::new();
        let mut sink = PlayerRewards::new(&mut ledger, None);
        sink.credit_experience(500);
        assert!(!sink.leveled_up());
    }

    #[test]
    fn test_reset_progression() {
        let mut state = PlayerState::new(PlayerId::new("p"), ChaCha8Rng::seed_from_u64(1));
        state.ledger.credit(10);
        state.counters.feed_count = 3;
        state.reset_progression();
        assert_eq!(state.ledger.coins(), 0);
        assert_eq!(state.counters, PlayerCounters::default());
    }
}
