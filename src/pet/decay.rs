//! Time-based stat erosion
//!
//! Decay is never ticked. It is computed on demand from the baseline stats
//! and the time elapsed since the pet was last touched.

use chrono::Duration;

use crate::core::config::DecayConfig;
use crate::pet::stats::{StatModel, StatName};

/// Result of applying decay to a baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecayOutcome {
    pub stats: StatModel,
    /// Sleeping pet has recovered enough energy to wake up
    pub should_wake: bool,
}

/// Whole hours in `elapsed`; negative spans count as zero
pub fn whole_hours(elapsed: Duration) -> u32 {
    elapsed.num_hours().clamp(0, u32::MAX as i64) as u32
}

fn capped_loss(per_hour: u32, hours: u32, cap: u32) -> i32 {
    per_hour.saturating_mul(hours).min(cap).min(i32::MAX as u32) as i32
}

/// Apply decay for `elapsed` to `stats`.
///
/// Pure: the input is untouched and the same inputs always give the same
/// output. Experience is never affected.
pub fn apply_decay(
    stats: &StatModel,
    elapsed: Duration,
    is_asleep: bool,
    config: &DecayConfig,
) -> DecayOutcome {
    let hours = whole_hours(elapsed);
    let mut decayed = stats.clone();

    if hours == 0 {
        return DecayOutcome { stats: decayed, should_wake: false };
    }

    decayed.adjust(
        StatName::Hunger,
        -capped_loss(config.hunger_per_hour, hours, config.hunger_cap),
    );
    decayed.adjust(
        StatName::Cleanliness,
        -capped_loss(config.cleanliness_per_hour, hours, config.cleanliness_cap),
    );
    decayed.adjust(
        StatName::Happiness,
        -capped_loss(config.happiness_per_hour, hours, config.happiness_cap),
    );

    let mut should_wake = false;
    if is_asleep {
        decayed.adjust(
            StatName::Energy,
            capped_loss(config.sleep_energy_per_hour, hours, config.sleep_energy_cap),
        );
        should_wake = decayed.energy() >= config.wake_threshold;
    }

    DecayOutcome { stats: decayed, should_wake }
}
