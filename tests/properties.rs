//! Property tests for the engine's invariants
//!
//! - Stats stay within 0..=100 under any sequence of changes
//! - Decay reads are pure, bounded and only ever move stats one way
//! - Achievement progress never goes backwards and pays out once
//! - The ledger never goes negative and always balances

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use pet_haven::achievements::{
    AchievementDefinition, AchievementTracker, AchievementType, Reward, RewardSink,
};
use pet_haven::core::config::DecayConfig;
use pet_haven::core::types::{PetType, PlayerId};
use pet_haven::ledger::ProgressionLedger;
use pet_haven::pet::{apply_decay, level_for, Pet, StatModel, StatName, MAX_LEVEL};
use pet_haven::PetError;

fn stat_name() -> impl Strategy<Value = StatName> {
    prop::sample::select(StatName::ALL.to_vec())
}

fn stats() -> impl Strategy<Value = StatModel> {
    (0..=100i32, 0..=100i32, 0..=100i32, 0..=100i32, 0..=100i32)
        .prop_map(|(a, b, c, d, e)| StatModel::new(a, b, c, d, e))
}

// ============================================================================
// Stat model
// ============================================================================

proptest! {
    #[test]
    fn stats_stay_in_bounds(
        start in stats(),
        changes in prop::collection::vec((stat_name(), -300..300i32), 0..50),
    ) {
        let mut stats = start;
        for (stat, delta) in changes {
            stats.adjust(stat, delta);
            prop_assert!(stats.is_within_bounds());
        }
    }

    #[test]
    fn level_is_derived_and_capped(experience in any::<u32>()) {
        let stats = StatModel::default().with_experience(experience);
        prop_assert_eq!(stats.level(), level_for(experience));
        prop_assert!(stats.level() >= 1 && stats.level() <= MAX_LEVEL);
    }
}

// ============================================================================
// Decay
// ============================================================================

proptest! {
    #[test]
    fn decay_is_pure_and_bounded(
        start in stats(),
        minutes in -600i64..200_000,
        asleep in any::<bool>(),
    ) {
        let config = DecayConfig::default();
        let elapsed = Duration::minutes(minutes);
        let first = apply_decay(&start, elapsed, asleep, &config);
        let second = apply_decay(&start, elapsed, asleep, &config);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.stats.is_within_bounds());

        // Awake pets only lose; energy and health never move while awake
        prop_assert!(first.stats.hunger() <= start.hunger());
        prop_assert!(first.stats.cleanliness() <= start.cleanliness());
        prop_assert!(first.stats.happiness() <= start.happiness());
        prop_assert!(start.hunger() - first.stats.hunger() <= config.hunger_cap as u8);
        prop_assert_eq!(first.stats.health(), start.health());
        if asleep {
            prop_assert!(first.stats.energy() >= start.energy());
        } else {
            prop_assert_eq!(first.stats.energy(), start.energy());
            prop_assert!(!first.should_wake);
        }
        prop_assert_eq!(first.stats.experience(), start.experience());
    }

    /// A read at t1 followed by a read at t1 + t2 equals a single read at t1 + t2
    #[test]
    fn reads_compose(start in stats(), t1 in 0i64..100, t2 in 0i64..100) {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let config = DecayConfig::default();
        let mut pet = Pet::new(PlayerId::new("p"), "Prop", PetType::Hamster, serde_json::Value::Null, created);
        pet.stats = start;

        let stored = pet.clone();
        let _ = pet.view_at(created + Duration::hours(t1), &config);
        prop_assert_eq!(&pet, &stored);

        let later = created + Duration::hours(t1 + t2);
        prop_assert_eq!(pet.view_at(later, &config), stored.view_at(later, &config));
    }
}

// ============================================================================
// Achievements
// ============================================================================

#[derive(Default)]
struct CountingSink {
    coins: u32,
    experience: u32,
    items: Vec<String>,
}

impl RewardSink for CountingSink {
    fn credit_coins(&mut self, coins: u32) {
        self.coins += coins;
    }
    fn credit_experience(&mut self, experience: u32) {
        self.experience += experience;
    }
    fn grant_item(&mut self, item_id: &str) {
        self.items.push(item_id.to_string());
    }
}

fn definitions() -> Vec<AchievementDefinition> {
    let def = |id: &str, achievement_type, target, coins| AchievementDefinition {
        id: id.into(),
        name: id.into(),
        description: String::new(),
        icon: String::new(),
        achievement_type,
        target,
        reward: Reward { coins, experience: 1, item: Some(format!("{}_badge", id)), title: None },
    };
    vec![
        def("feed_5", AchievementType::FeedCount, 5, 10),
        def("feed_20", AchievementType::FeedCount, 20, 100),
        def("level_3", AchievementType::LevelReached, 3, 30),
        def("happy", AchievementType::PetHappiness, 90, 50),
    ]
}

#[derive(Debug, Clone)]
enum Update {
    Feed(u32),
    Level(u32),
    Happiness(u32),
}

fn update() -> impl Strategy<Value = Update> {
    prop_oneof![
        (0..4u32).prop_map(Update::Feed),
        (0..6u32).prop_map(Update::Level),
        (0..=100u32).prop_map(Update::Happiness),
    ]
}

proptest! {
    #[test]
    fn progress_is_monotonic_and_pays_once(updates in prop::collection::vec(update(), 0..60)) {
        let defs = definitions();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut tracker = AchievementTracker::new();
        let mut sink = CountingSink::default();
        let mut unlocked_total = 0;

        for update in updates {
            let before: Vec<_> = defs.iter().map(|d| tracker.progress(&d.id)).collect();
            let newly = match update {
                Update::Feed(n) => tracker.increment(&defs, AchievementType::FeedCount, n, now, &mut sink),
                Update::Level(v) => tracker.set(&defs, AchievementType::LevelReached, v, now, &mut sink),
                Update::Happiness(v) => tracker.set(&defs, AchievementType::PetHappiness, v, now, &mut sink),
            };
            unlocked_total += newly.len();

            for (def, old) in defs.iter().zip(before) {
                let new = tracker.progress(&def.id);
                prop_assert!(new.current >= old.current);
                prop_assert!(new.current <= def.target);
                prop_assert!(!old.unlocked || new.unlocked);
                prop_assert_eq!(new.unlocked, new.current >= def.target);
                if old.unlocked {
                    prop_assert_eq!(new.unlocked_at, old.unlocked_at);
                }
            }
        }

        prop_assert!(unlocked_total <= defs.len());
        prop_assert_eq!(
            unlocked_total,
            defs.iter().filter(|d| tracker.is_unlocked(&d.id)).count()
        );
        prop_assert_eq!(sink.items.len(), unlocked_total);
        let expected_coins: u32 = defs
            .iter()
            .filter(|d| tracker.is_unlocked(&d.id))
            .map(|d| d.reward.coins)
            .sum();
        prop_assert_eq!(sink.coins, expected_coins);
    }
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Clone)]
enum Money {
    Credit(u32),
    Debit(u32),
}

fn money() -> impl Strategy<Value = Money> {
    prop_oneof![
        (0..500u32).prop_map(Money::Credit),
        (0..800u32).prop_map(Money::Debit),
    ]
}

proptest! {
    #[test]
    fn ledger_never_overdraws(ops in prop::collection::vec(money(), 0..100)) {
        let mut ledger = ProgressionLedger::new();
        for op in ops {
            match op {
                Money::Credit(amount) => ledger.credit(amount),
                Money::Debit(amount) => {
                    let before = ledger.snapshot();
                    match ledger.debit(amount) {
                        Ok(()) => prop_assert_eq!(ledger.coins(), before.coins - amount),
                        Err(PetError::InsufficientFunds { needed, available }) => {
                            prop_assert_eq!(needed, amount);
                            prop_assert_eq!(available, before.coins);
                            prop_assert_eq!(ledger.snapshot(), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
            }
            let snapshot = ledger.snapshot();
            prop_assert_eq!(
                snapshot.coins as u64,
                snapshot.lifetime_earned - snapshot.lifetime_spent
            );
        }
    }

    #[test]
    fn inventory_never_negative(ops in prop::collection::vec((any::<bool>(), 0..5u32), 0..60)) {
        let mut ledger = ProgressionLedger::new();
        let mut expected = 0u32;
        for (add, count) in ops {
            if add {
                ledger.add_item("apple", count);
                expected += count;
            } else if ledger.remove_item("apple", count).is_ok() {
                expected -= count;
            }
            prop_assert_eq!(ledger.quantity("apple"), expected);
        }
    }
}
