//! Runs care actions against a player's state
//!
//! Every check happens on a decayed working copy of the pet. Nothing in the
//! player's state changes until all checks pass, and nothing after that point
//! can fail.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::achievements::{
    AchievementDefinition, AchievementTracker, AchievementType, RewardSink,
};
use crate::actions::ActionDefinition;
use crate::catalog::Catalog;
use crate::core::config::EngineConfig;
use crate::core::error::{PetError, Result};
use crate::core::types::{PetId, Timestamp};
use crate::engine::player::{PlayerRewards, PlayerState};
use crate::pet::Pet;

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: String,
    pub message: String,
    /// The pet after the action, as stored
    pub pet: Pet,
    pub experience_gained: u32,
    pub leveled_up: bool,
    /// Bonus coins dropped by this action
    pub coins_earned: u32,
    pub newly_unlocked: Vec<AchievementDefinition>,
}

/// Current values of the achievement types re-checked after every action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteProgress {
    pub level: u32,
    pub happiness: u32,
    pub days_owned: u32,
    pub perfect_care: u32,
}

/// Stats at or above this count as perfect care
pub const PERFECT_CARE_THRESHOLD: u8 = 80;

impl AbsoluteProgress {
    pub fn of(pet: &Pet, now: Timestamp) -> Self {
        Self {
            level: pet.level(),
            happiness: pet.stats.happiness() as u32,
            days_owned: pet.age_days(now).clamp(0, u32::MAX as i64) as u32,
            perfect_care: pet.stats.all_at_least(PERFECT_CARE_THRESHOLD) as u32,
        }
    }

    /// Raise every absolute achievement to these values
    pub fn record(
        &self,
        tracker: &mut AchievementTracker,
        definitions: &[AchievementDefinition],
        now: Timestamp,
        sink: &mut dyn RewardSink,
    ) -> Vec<AchievementDefinition> {
        let mut unlocked = Vec::new();
        for (kind, value) in [
            (AchievementType::LevelReached, self.level),
            (AchievementType::PetHappiness, self.happiness),
            (AchievementType::DaysOwned, self.days_owned),
            (AchievementType::PerfectCare, self.perfect_care),
        ] {
            unlocked.extend(tracker.set(definitions, kind, value, now, sink));
        }
        unlocked
    }
}

pub struct ActionExecutor<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Run `action_name` on one of the player's pets. Randomness comes from
    /// the player's own generator.
    pub fn execute(
        &self,
        state: &mut PlayerState,
        pet_id: PetId,
        action_name: &str,
        now: Timestamp,
    ) -> Result<ActionOutcome> {
        let action = self
            .catalog
            .action(action_name)
            .ok_or_else(|| PetError::not_found("action", action_name))?;
        let index = state
            .pet_index(pet_id)
            .ok_or_else(|| PetError::not_found("pet", pet_id))?;

        let mut pet = state.pets[index].clone();
        pet.materialize(now, &self.config.decay);

        let availability = action.availability(&pet);
        if !availability.available {
            return Err(PetError::PreconditionFailed(
                availability.reason.unwrap_or_else(|| "not available".into()),
            ));
        }

        // Validated; from here on every step succeeds
        action.apply_effects(&mut pet);
        let experience_gained = self.config.action_experience;
        let mut leveled_up = pet.stats.add_experience(experience_gained);
        let coins_earned = self.roll_coin_bonus(&mut state.rng);

        state.counters.actions_performed += 1;
        match action.counter {
            Some(AchievementType::FeedCount) => state.counters.feed_count += 1,
            Some(AchievementType::PlayCount) => state.counters.play_count += 1,
            _ => {}
        }

        let absolute = AbsoluteProgress::of(&pet, now);
        let definitions = self.catalog.achievements();
        let mut newly_unlocked = Vec::new();
        {
            let mut sink = PlayerRewards::new(&mut state.ledger, Some(&mut pet.stats));
            sink.credit_coins(coins_earned);

            let tracker = &mut state.achievements;
            if let Some(counter) = action.counter {
                newly_unlocked.extend(tracker.increment(definitions, counter, 1, now, &mut sink));
            }
            newly_unlocked.extend(tracker.increment(
                definitions,
                AchievementType::CoinsEarned,
                coins_earned,
                now,
                &mut sink,
            ));
            newly_unlocked.extend(absolute.record(tracker, definitions, now, &mut sink));
            leveled_up |= sink.leveled_up();
        }

        state.pets[index] = pet.clone();

        tracing::debug!(
            pet = %pet.id,
            action = %action.name,
            coins = coins_earned,
            unlocked = newly_unlocked.len(),
            "action executed"
        );

        Ok(ActionOutcome {
            action: action.name.clone(),
            message: action.render_message(&pet.name),
            pet,
            experience_gained,
            leveled_up,
            coins_earned,
            newly_unlocked,
        })
    }

    /// Actions whose checks pass for `pet` as given
    pub fn available_actions(&self, pet: &Pet) -> Vec<&'a ActionDefinition> {
        self.catalog
            .actions()
            .iter()
            .filter(|a| a.availability(pet).available)
            .collect()
    }

    fn roll_coin_bonus<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if !rng.gen_bool(self.config.coin_bonus_chance) {
            return 0;
        }
        rng.gen_range(self.config.coin_bonus_min..=self.config.coin_bonus_max)
    }
}
