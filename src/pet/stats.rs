//! The five bounded attributes describing a pet's condition

use serde::{Deserialize, Serialize};

/// Upper bound of every bounded stat
pub const STAT_MAX: u8 = 100;
/// Experience needed per level
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
/// Level cap
pub const MAX_LEVEL: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    Hunger,
    Cleanliness,
    Happiness,
    Energy,
    Health,
}

impl StatName {
    pub const ALL: [StatName; 5] = [
        StatName::Hunger,
        StatName::Cleanliness,
        StatName::Happiness,
        StatName::Energy,
        StatName::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Hunger => "hunger",
            StatName::Cleanliness => "cleanliness",
            StatName::Happiness => "happiness",
            StatName::Energy => "energy",
            StatName::Health => "health",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// Hunger counts up toward full: 0 = starving, 100 = stuffed.
/// The other four read the natural way round (100 = best).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModel {
    hunger: u8,
    cleanliness: u8,
    happiness: u8,
    energy: u8,
    health: u8,
    experience: u32,
}

impl Default for StatModel {
    fn default() -> Self {
        Self {
            hunger: 50,
            cleanliness: 80,
            happiness: 60,
            energy: 70,
            health: 90,
            experience: 0,
        }
    }
}

fn clamp_stat(value: i32) -> u8 {
    value.clamp(0, STAT_MAX as i32) as u8
}

/// Level reached with a given amount of experience
pub fn level_for(experience: u32) -> u32 {
    (experience / EXPERIENCE_PER_LEVEL + 1).min(MAX_LEVEL)
}

impl StatModel {
    pub fn new(hunger: i32, cleanliness: i32, happiness: i32, energy: i32, health: i32) -> Self {
        Self {
            hunger: clamp_stat(hunger),
            cleanliness: clamp_stat(cleanliness),
            happiness: clamp_stat(happiness),
            energy: clamp_stat(energy),
            health: clamp_stat(health),
            experience: 0,
        }
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn get(&self, stat: StatName) -> u8 {
        match stat {
            StatName::Hunger => self.hunger,
            StatName::Cleanliness => self.cleanliness,
            StatName::Happiness => self.happiness,
            StatName::Energy => self.energy,
            StatName::Health => self.health,
        }
    }

    /// Set a stat, clamped to 0..=100
    pub fn set(&mut self, stat: StatName, value: i32) {
        let value = clamp_stat(value);
        match stat {
            StatName::Hunger => self.hunger = value,
            StatName::Cleanliness => self.cleanliness = value,
            StatName::Happiness => self.happiness = value,
            StatName::Energy => self.energy = value,
            StatName::Health => self.health = value,
        }
    }

    /// Shift a stat by `delta`, clamped
    pub fn adjust(&mut self, stat: StatName, delta: i32) {
        self.set(stat, self.get(stat) as i32 + delta);
    }

    pub fn hunger(&self) -> u8 {
        self.hunger
    }

    pub fn cleanliness(&self) -> u8 {
        self.cleanliness
    }

    pub fn happiness(&self) -> u8 {
        self.happiness
    }

    pub fn energy(&self) -> u8 {
        self.energy
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Always derived from experience, never stored
    pub fn level(&self) -> u32 {
        level_for(self.experience)
    }

    /// Add experience, returns true if the pet leveled up
    pub fn add_experience(&mut self, amount: u32) -> bool {
        let before = self.level();
        self.experience = self.experience.saturating_add(amount);
        self.level() > before
    }

    /// Mean of the five bounded stats
    pub fn average(&self) -> u8 {
        let sum: u32 = StatName::ALL.iter().map(|s| self.get(*s) as u32).sum();
        (sum / StatName::ALL.len() as u32) as u8
    }

    /// True if every bounded stat is at least `threshold`
    pub fn all_at_least(&self, threshold: u8) -> bool {
        StatName::ALL.iter().all(|s| self.get(*s) >= threshold)
    }

    /// Clamp values that escaped 0..=100 (e.g. from hand-edited input).
    /// Returns the stats that had to be repaired.
    pub fn sanitize(&mut self) -> Vec<StatName> {
        let mut repaired = Vec::new();
        for stat in StatName::ALL {
            let value = self.get(stat);
            if value > STAT_MAX {
                self.set(stat, value as i32);
                repaired.push(stat);
            }
        }
        repaired
    }

    pub fn is_within_bounds(&self) -> bool {
        StatName::ALL.iter().all(|s| self.get(*s) <= STAT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_inputs() {
        let stats = StatModel::new(-20, 150, 50, 100, 0);
        assert_eq!(stats.hunger(), 0);
        assert_eq!(stats.cleanliness(), 100);
        assert_eq!(stats.happiness(), 50);
    }

    #[test]
    fn test_adjust_clamps_both_ways() {
        let mut stats = StatModel::default();
        stats.adjust(StatName::Happiness, 500);
        assert_eq!(stats.happiness(), 100);
        stats.adjust(StatName::Happiness, -500);
        assert_eq!(stats.happiness(), 0);
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(4_899), 49);
        assert_eq!(level_for(4_900), 50);
        assert_eq!(level_for(1_000_000), 50);
    }

    #[test]
    fn test_add_experience_reports_level_up() {
        let mut stats = StatModel::default().with_experience(95);
        assert!(stats.add_experience(10));
        assert_eq!(stats.level(), 2);
        assert!(!stats.add_experience(10));
    }

    #[test]
    fn test_no_level_up_past_cap() {
        let mut stats = StatModel::default().with_experience(10_000);
        assert!(!stats.add_experience(500));
        assert_eq!(stats.level(), MAX_LEVEL);
    }

    #[test]
    fn test_sanitize_repairs_deserialized_garbage() {
        let json = r#"{"hunger":250,"cleanliness":80,"happiness":60,"energy":101,"health":90,"experience":0}"#;
        let mut stats: StatModel = serde_json::from_str(json).unwrap();
        assert!(!stats.is_within_bounds());

        let repaired = stats.sanitize();
        assert_eq!(repaired, vec![StatName::Hunger, StatName::Energy]);
        assert_eq!(stats.hunger(), 100);
        assert_eq!(stats.energy(), 100);
        assert!(stats.is_within_bounds());
    }

    #[test]
    fn test_average_and_threshold() {
        let stats = StatModel::new(80, 80, 80, 80, 100);
        assert_eq!(stats.average(), 84);
        assert!(stats.all_at_least(80));
        assert!(!stats.all_at_least(81));
    }

    #[test]
    fn test_stat_name_parse() {
        assert_eq!(StatName::parse("Energy"), Some(StatName::Energy));
        assert_eq!(StatName::parse("mana"), None);
    }
}
