//! Pets: identity, baseline stats and the lazily-decayed view

pub mod decay;
pub mod stats;

pub use decay::{apply_decay, whole_hours, DecayOutcome};
pub use stats::{level_for, StatModel, StatName, EXPERIENCE_PER_LEVEL, MAX_LEVEL, STAT_MAX};

use serde::{Deserialize, Serialize};

use crate::core::config::DecayConfig;
use crate::core::types::{PetId, PetType, PlayerId, Timestamp};

/// Mood bucket derived from the average of the five stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sick,
    Sad,
    Okay,
    Happy,
    Excited,
}

impl Mood {
    pub fn from_stats(stats: &StatModel) -> Self {
        match stats.average() / 20 {
            0 | 1 => Mood::Sick,
            2 => Mood::Sad,
            3 => Mood::Okay,
            4 => Mood::Happy,
            _ => Mood::Excited,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Sick => "😢",
            Mood::Sad => "😔",
            Mood::Okay => "😐",
            Mood::Happy => "😊",
            Mood::Excited => "😄",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Baby,
    Juvenile,
    Young,
    Adult,
}

impl GrowthStage {
    pub fn from_age_days(days: i64) -> Self {
        match days {
            d if d <= 7 => GrowthStage::Baby,
            d if d <= 30 => GrowthStage::Juvenile,
            d if d <= 90 => GrowthStage::Young,
            _ => GrowthStage::Adult,
        }
    }
}

/// Hours without interaction after which a pet wants attention
pub const ATTENTION_AFTER_HOURS: i64 = 12;

/// A virtual pet.
///
/// `stats` is the baseline as of `last_interaction_at`. Callers that want the
/// pet as it is right now go through [`Pet::view_at`]; writers go through
/// [`Pet::materialize`] first so decay is never applied twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub owner: PlayerId,
    pub name: String,
    pub pet_type: PetType,
    pub stats: StatModel,
    /// Appearance and personality, stored as given
    pub customization: serde_json::Value,
    pub created_at: Timestamp,
    pub last_interaction_at: Timestamp,
    pub is_asleep: bool,
}

impl Pet {
    pub fn new(
        owner: PlayerId,
        name: impl Into<String>,
        pet_type: PetType,
        customization: serde_json::Value,
        now: Timestamp,
    ) -> Self {
        Self {
            id: PetId::new(),
            owner,
            name: name.into(),
            pet_type,
            stats: StatModel::default(),
            customization,
            created_at: now,
            last_interaction_at: now,
            is_asleep: false,
        }
    }

    /// The pet as of `now`. Does not modify the stored baseline.
    pub fn view_at(&self, now: Timestamp, config: &DecayConfig) -> Pet {
        let mut view = self.clone();
        view.apply_elapsed(now, config);
        view
    }

    /// Fold elapsed decay into the baseline and rebase to `now`
    pub fn materialize(&mut self, now: Timestamp, config: &DecayConfig) {
        self.apply_elapsed(now, config);
        self.touch(now);
    }

    /// Mark an interaction without touching stats
    pub fn touch(&mut self, now: Timestamp) {
        self.last_interaction_at = now;
    }

    fn apply_elapsed(&mut self, now: Timestamp, config: &DecayConfig) {
        let repaired = self.stats.sanitize();
        if !repaired.is_empty() {
            tracing::warn!(pet = %self.id, ?repaired, "clamped out-of-range stats");
        }

        let outcome = apply_decay(
            &self.stats,
            now - self.last_interaction_at,
            self.is_asleep,
            config,
        );
        self.stats = outcome.stats;
        if outcome.should_wake {
            self.is_asleep = false;
        }
    }

    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    pub fn mood(&self) -> Mood {
        Mood::from_stats(&self.stats)
    }

    pub fn age_days(&self, now: Timestamp) -> i64 {
        (now - self.created_at).num_days().max(0)
    }

    pub fn growth_stage(&self, now: Timestamp) -> GrowthStage {
        GrowthStage::from_age_days(self.age_days(now))
    }

    pub fn needs_urgent_care(&self) -> bool {
        self.stats.hunger() <= 20 || self.stats.cleanliness() <= 20 || self.stats.health() <= 30
    }

    pub fn needs_attention(&self, now: Timestamp) -> bool {
        self.needs_urgent_care()
            || (now - self.last_interaction_at).num_hours() > ATTENTION_AFTER_HOURS
    }

    /// Action names worth suggesting for the current stats
    pub fn recommended_actions(&self) -> Vec<&'static str> {
        let mut actions = Vec::new();
        if self.stats.hunger() <= 70 {
            actions.push("feed");
        }
        if self.stats.cleanliness() <= 70 {
            actions.push("clean");
        }
        if self.stats.happiness() <= 70 {
            actions.push("play");
        }
        if self.stats.energy() <= 30 {
            actions.push("sleep");
        }
        if actions.is_empty() {
            actions.extend(["pet", "talk"]);
        }
        actions
    }

    /// One-line human description
    pub fn status_line(&self) -> String {
        if self.is_asleep {
            return format!("{} is sleeping 😴", self.name);
        }
        if self.stats.hunger() <= 20 {
            return format!("{} is very hungry", self.name);
        }
        if self.stats.cleanliness() <= 20 {
            return format!("{} is dirty and needs a bath", self.name);
        }
        if self.stats.health() <= 30 {
            return format!("{} does not look well", self.name);
        }
        let mood = self.mood();
        format!("{} feels {:?} {}", self.name, mood, mood.emoji())
    }
}
