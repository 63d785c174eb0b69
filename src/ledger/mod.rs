//! Progression ledger - a player's coins and inventory

pub mod shop;

pub use shop::{ItemDefinition, ItemKind};

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};

/// Coins and items owned by one player.
///
/// Coins are unsigned and `debit` refuses to overdraw, so the balance can
/// never go negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionLedger {
    coins: u32,
    items: AHashMap<String, u32>,
    lifetime_earned: u64,
    lifetime_spent: u64,
}

/// Point-in-time copy of a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub coins: u32,
    pub items: BTreeMap<String, u32>,
    pub lifetime_earned: u64,
    pub lifetime_spent: u64,
}

impl ProgressionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
        self.lifetime_earned += amount as u64;
    }

    /// Remove `amount` coins, or nothing at all if the balance is short
    pub fn debit(&mut self, amount: u32) -> Result<()> {
        if self.coins < amount {
            return Err(PetError::InsufficientFunds {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        self.lifetime_spent += amount as u64;
        Ok(())
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.quantity(item_id) > 0
    }

    pub fn add_item(&mut self, item_id: &str, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.items.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Remove `count` of an item; fails without change if fewer are held
    pub fn remove_item(&mut self, item_id: &str, count: u32) -> Result<()> {
        let held = self.quantity(item_id);
        if held < count {
            return Err(PetError::precondition(format!(
                "you do not have {} {}",
                count, item_id
            )));
        }
        if held == count {
            self.items.remove(item_id);
        } else if let Some(entry) = self.items.get_mut(item_id) {
            *entry -= count;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            coins: self.coins,
            items: self
                .items
                .iter()
                .map(|(id, qty)| (id.clone(), *qty))
                .collect(),
            lifetime_earned: self.lifetime_earned,
            lifetime_spent: self.lifetime_spent,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Lifetime counters kept per player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCounters {
    pub feed_count: u32,
    pub play_count: u32,
    pub items_bought: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub actions_performed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let mut ledger = ProgressionLedger::new();
        ledger.credit(100);
        ledger.debit(30).unwrap();
        assert_eq!(ledger.coins(), 70);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.lifetime_earned, 100);
        assert_eq!(snapshot.lifetime_spent, 30);
    }

    #[test]
    fn test_overdraw_is_rejected_whole() {
        let mut ledger = ProgressionLedger::new();
        ledger.credit(20);

        let err = ledger.debit(50).unwrap_err();
        assert_eq!(err, PetError::InsufficientFunds { needed: 50, available: 20 });
        // No partial deduction
        assert_eq!(ledger.coins(), 20);
    }

    #[test]
    fn test_items_add_remove() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_item("apple", 2);
        assert_eq!(ledger.quantity("apple"), 2);

        ledger.remove_item("apple", 1).unwrap();
        assert_eq!(ledger.quantity("apple"), 1);

        assert!(ledger.remove_item("apple", 5).is_err());
        assert_eq!(ledger.quantity("apple"), 1);

        ledger.remove_item("apple", 1).unwrap();
        assert!(!ledger.has_item("apple"));
        assert!(ledger.snapshot().items.is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_item("fish", 1);
        ledger.add_item("ball", 1);
        ledger.add_item("apple", 3);

        let ids: Vec<_> = ledger.snapshot().items.into_keys().collect();
        assert_eq!(ids, vec!["apple", "ball", "fish"]);
    }
}
