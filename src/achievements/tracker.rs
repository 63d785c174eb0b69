//! Per-player achievement progress
//!
//! Progress only moves forward. Once an entry unlocks it is terminal: later
//! updates of its type skip it, so the reward is paid exactly once.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::achievements::{AchievementDefinition, AchievementType};
use crate::core::types::Timestamp;

/// Receives achievement rewards
pub trait RewardSink {
    fn credit_coins(&mut self, coins: u32);
    fn credit_experience(&mut self, experience: u32);
    fn grant_item(&mut self, item_id: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub current: u32,
    pub unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
}

/// Definition paired with a player's progress, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub definition: AchievementDefinition,
    pub progress: AchievementProgress,
}

#[derive(Debug, Clone, Default)]
pub struct AchievementTracker {
    progress: AHashMap<String, AchievementProgress>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress for one definition; untouched entries read as zero
    pub fn progress(&self, achievement_id: &str) -> AchievementProgress {
        self.progress.get(achievement_id).cloned().unwrap_or_default()
    }

    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.progress
            .get(achievement_id)
            .map(|p| p.unlocked)
            .unwrap_or(false)
    }

    /// Add `delta` to every locked definition of `achievement_type`.
    /// Returns the definitions that unlocked.
    pub fn increment(
        &mut self,
        definitions: &[AchievementDefinition],
        achievement_type: AchievementType,
        delta: u32,
        now: Timestamp,
        sink: &mut dyn RewardSink,
    ) -> Vec<AchievementDefinition> {
        if delta == 0 {
            return Vec::new();
        }
        self.advance(definitions, achievement_type, now, sink, |current, target| {
            current.saturating_add(delta).min(target)
        })
    }

    /// Raise every locked definition of `achievement_type` to the observed
    /// `value`. Never lowers progress.
    pub fn set(
        &mut self,
        definitions: &[AchievementDefinition],
        achievement_type: AchievementType,
        value: u32,
        now: Timestamp,
        sink: &mut dyn RewardSink,
    ) -> Vec<AchievementDefinition> {
        self.advance(definitions, achievement_type, now, sink, |current, target| {
            current.max(value.min(target))
        })
    }

    fn advance(
        &mut self,
        definitions: &[AchievementDefinition],
        achievement_type: AchievementType,
        now: Timestamp,
        sink: &mut dyn RewardSink,
        next: impl Fn(u32, u32) -> u32,
    ) -> Vec<AchievementDefinition> {
        let mut unlocked = Vec::new();

        for def in definitions.iter().filter(|d| d.achievement_type == achievement_type) {
            let entry = self.progress.entry(def.id.clone()).or_default();
            if entry.unlocked {
                continue;
            }

            entry.current = next(entry.current, def.target);
            if entry.current < def.target {
                continue;
            }

            entry.unlocked = true;
            entry.unlocked_at = Some(now);

            sink.credit_coins(def.reward.coins);
            sink.credit_experience(def.reward.experience);
            if let Some(item) = &def.reward.item {
                sink.grant_item(item);
            }

            tracing::info!(achievement = %def.id, coins = def.reward.coins, "achievement unlocked");
            unlocked.push(def.clone());
        }

        unlocked
    }

    /// Every definition with this player's progress, in catalog order
    pub fn statuses(&self, definitions: &[AchievementDefinition]) -> Vec<AchievementStatus> {
        definitions
            .iter()
            .map(|def| AchievementStatus {
                definition: def.clone(),
                progress: self.progress(&def.id),
            })
            .collect()
    }

    /// Titles earned from unlocked achievements
    pub fn titles(&self, definitions: &[AchievementDefinition]) -> Vec<String> {
        definitions
            .iter()
            .filter(|d| self.is_unlocked(&d.id))
            .filter_map(|d| d.reward.title.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.progress.clear();
    }
}
