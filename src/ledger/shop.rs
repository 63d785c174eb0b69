//! Shop items and their usability rules

use serde::{Deserialize, Serialize};

use crate::pet::{Pet, StatName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Food,
    Toy,
    Decoration,
    Medicine,
    Accessory,
}

impl ItemKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "food" => Some(ItemKind::Food),
            "toy" => Some(ItemKind::Toy),
            "decoration" => Some(ItemKind::Decoration),
            "medicine" => Some(ItemKind::Medicine),
            "accessory" => Some(ItemKind::Accessory),
            _ => None,
        }
    }
}

/// Rarity at or below which an item is sold from the start
pub const DEFAULT_UNLOCK_RARITY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub kind: ItemKind,
    pub cost: u32,
    /// 1 (common) to 5 (legendary)
    pub rarity: u8,
    pub effects: Vec<(StatName, i32)>,
    /// Available for purchase
    pub unlocked: bool,
}

impl ItemDefinition {
    /// Whether the item would do anything for this pet right now
    pub fn usable_on(&self, pet: &Pet) -> bool {
        let stats = &pet.stats;
        match self.kind {
            ItemKind::Food => stats.hunger() < 100,
            ItemKind::Medicine => stats.health() < 80,
            ItemKind::Toy => stats.happiness() < 100 && stats.energy() > 20,
            ItemKind::Decoration | ItemKind::Accessory => true,
        }
    }

    pub fn apply_to(&self, pet: &mut Pet) {
        for (stat, delta) in &self.effects {
            pet.stats.adjust(*stat, *delta);
        }
    }

    pub fn use_message(&self, pet_name: &str) -> String {
        match self.kind {
            ItemKind::Food => format!("{} enjoyed the {}! {}", pet_name, self.name, self.icon),
            ItemKind::Toy => format!("{} had fun with the {}! {}", pet_name, self.name, self.icon),
            ItemKind::Medicine => {
                format!("{} took the {} and feels better. {}", pet_name, self.name, self.icon)
            }
            ItemKind::Decoration => {
                format!("Added a {} for {}! {}", self.name, pet_name, self.icon)
            }
            ItemKind::Accessory => {
                format!("{} is wearing the {} and looks adorable! {}", pet_name, self.name, self.icon)
            }
        }
    }
}
