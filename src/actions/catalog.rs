//! Action definitions
//!
//! Actions are data: each one is a list of stat effects guarded by
//! preconditions. The executor interprets them, so adding a care action is a
//! catalog change only.

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementType;
use crate::pet::{Pet, StatName};

/// Guard that must hold before an action runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    pub kind: PreconditionKind,
    /// Shown to the player when the guard fails
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreconditionKind {
    /// stat < threshold
    StatBelow { stat: StatName, threshold: u8 },
    /// stat > threshold
    StatAbove { stat: StatName, threshold: u8 },
    MustBeAsleep,
}

impl Precondition {
    pub fn holds(&self, pet: &Pet) -> bool {
        match self.kind {
            PreconditionKind::StatBelow { stat, threshold } => pet.stats.get(stat) < threshold,
            PreconditionKind::StatAbove { stat, threshold } => pet.stats.get(stat) > threshold,
            PreconditionKind::MustBeAsleep => pet.is_asleep,
        }
    }
}

/// Change to the pet's sleep flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepTransition {
    FallAsleep,
    WakeUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Lookup key, e.g. "feed"
    pub name: String,
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub effects: Vec<(StatName, i32)>,
    pub preconditions: Vec<Precondition>,
    pub allowed_while_asleep: bool,
    pub sleep: Option<SleepTransition>,
    /// Cumulative achievement counter bumped on success
    pub counter: Option<AchievementType>,
    /// Success message; `{name}` is replaced with the pet's name
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAvailability {
    pub available: bool,
    pub reason: Option<String>,
}

impl ActionAvailability {
    pub fn yes() -> Self {
        Self { available: true, reason: None }
    }

    pub fn no(reason: impl Into<String>) -> Self {
        Self { available: false, reason: Some(reason.into()) }
    }
}

impl ActionDefinition {
    /// Check sleep state then preconditions in declaration order
    pub fn availability(&self, pet: &Pet) -> ActionAvailability {
        if pet.is_asleep && !self.allowed_while_asleep {
            return ActionAvailability::no(format!("{} is asleep", pet.name));
        }
        match self.preconditions.iter().find(|p| !p.holds(pet)) {
            Some(failed) => ActionAvailability::no(failed.reason.clone()),
            None => ActionAvailability::yes(),
        }
    }

    /// Apply every effect with clamping
    pub fn apply_effects(&self, pet: &mut Pet) {
        for (stat, delta) in &self.effects {
            pet.stats.adjust(*stat, *delta);
        }
        match self.sleep {
            Some(SleepTransition::FallAsleep) => pet.is_asleep = true,
            Some(SleepTransition::WakeUp) => pet.is_asleep = false,
            None => {}
        }
    }

    pub fn render_message(&self, pet_name: &str) -> String {
        self.message.replace("{name}", pet_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PetType, PlayerId};
    use crate::pet::StatModel;

    fn feed() -> ActionDefinition {
        ActionDefinition {
            name: "feed".into(),
            display_name: "Feed".into(),
            icon: "🍽️".into(),
            description: String::new(),
            effects: vec![(StatName::Hunger, 25), (StatName::Happiness, 5)],
            preconditions: vec![Precondition {
                kind: PreconditionKind::StatBelow { stat: StatName::Hunger, threshold: 90 },
                reason: "not hungry".into(),
            }],
            allowed_while_asleep: false,
            sleep: None,
            counter: Some(AchievementType::FeedCount),
            message: "{name} munches happily".into(),
        }
    }

    fn pet_with(stats: StatModel) -> Pet {
        let mut pet = Pet::new(
            PlayerId::new("p"),
            "Bean",
            PetType::Dog,
            serde_json::Value::Null,
            chrono::Utc::now(),
        );
        pet.stats = stats;
        pet
    }

    #[test]
    fn test_precondition_blocks_full_pet() {
        let pet = pet_with(StatModel::new(95, 80, 60, 70, 90));
        let availability = feed().availability(&pet);
        assert!(!availability.available);
        assert_eq!(availability.reason.as_deref(), Some("not hungry"));
    }

    #[test]
    fn test_sleeping_pet_rejects_action() {
        let mut pet = pet_with(StatModel::default());
        pet.is_asleep = true;
        let availability = feed().availability(&pet);
        assert!(!availability.available);
        assert!(availability.reason.unwrap().contains("asleep"));
    }

    #[test]
    fn test_effects_clamp() {
        let mut pet = pet_with(StatModel::new(85, 80, 98, 70, 90));
        feed().apply_effects(&mut pet);
        assert_eq!(pet.stats.hunger(), 100);
        assert_eq!(pet.stats.happiness(), 100);
    }

    #[test]
    fn test_message_template() {
        assert_eq!(feed().render_message("Bean"), "Bean munches happily");
    }
}
