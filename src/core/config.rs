//! Engine configuration with documented constants
//!
//! All tuning numbers live here. Catalog content (which actions, games and
//! achievements exist) is data in `data/*.toml`; this struct only carries
//! the rules that interpret that data.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};

/// Rates and caps for lazy, time-based stat erosion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Hunger lost per elapsed hour
    pub hunger_per_hour: u32,
    /// Most hunger a single decay can remove
    ///
    /// The caps keep a pet that was ignored for a week recoverable:
    /// it comes back hungry and grubby, never zeroed out.
    pub hunger_cap: u32,

    /// Cleanliness lost per elapsed hour
    pub cleanliness_per_hour: u32,
    pub cleanliness_cap: u32,

    /// Happiness lost per elapsed hour
    pub happiness_per_hour: u32,
    pub happiness_cap: u32,

    /// Energy regained per hour while asleep
    pub sleep_energy_per_hour: u32,
    pub sleep_energy_cap: u32,

    /// A sleeping pet wakes once its energy reaches this value
    pub wake_threshold: u8,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            hunger_per_hour: 3,
            hunger_cap: 30,
            cleanliness_per_hour: 2,
            cleanliness_cap: 20,
            happiness_per_hour: 1,
            happiness_cap: 15,
            sleep_energy_per_hour: 10,
            sleep_energy_cap: 50,
            wake_threshold: 80,
        }
    }
}

/// Configuration for the progression engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === DECAY ===
    pub decay: DecayConfig,

    // === ACTIONS ===
    /// Flat experience granted for every successful care action
    pub action_experience: u32,

    /// Probability that a successful action also drops coins
    pub coin_bonus_chance: f64,

    /// Inclusive range of the coin drop
    pub coin_bonus_min: u32,
    pub coin_bonus_max: u32,

    // === MINI-GAMES ===
    /// Pets below this energy are too tired to start a game
    pub min_game_energy: u8,

    // === NEW PLAYERS ===
    /// Coins granted when a player adopts their first pet
    pub starting_coins: u32,

    /// Items granted with the first pet
    pub starting_items: Vec<String>,

    // === RANDOMNESS ===
    /// Master seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig::default(),

            action_experience: 10,
            coin_bonus_chance: 0.3,
            coin_bonus_min: 5,
            coin_bonus_max: 14,

            min_game_energy: 20,

            starting_coins: 100,
            starting_items: vec!["apple".into(), "ball".into()],

            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults with a fixed master seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| PetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PetError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.coin_bonus_chance) {
            return Err(PetError::Config(format!(
                "coin_bonus_chance ({}) must be within 0.0..=1.0",
                self.coin_bonus_chance
            )));
        }

        if self.coin_bonus_min > self.coin_bonus_max {
            return Err(PetError::Config(format!(
                "coin_bonus_min ({}) should be <= coin_bonus_max ({})",
                self.coin_bonus_min, self.coin_bonus_max
            )));
        }

        if self.decay.wake_threshold > 100 || self.min_game_energy > 100 {
            return Err(PetError::Config(
                "stat thresholds must be within 0..=100".into(),
            ));
        }

        Ok(())
    }
}
