//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied player identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for pets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId(pub Uuid);

impl PetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for mini-game sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wall-clock instant
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Species a player can adopt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    Cat,
    Dog,
    Rabbit,
    Hamster,
    Dragon,
    Panda,
    Penguin,
}

impl PetType {
    pub const ALL: [PetType; 7] = [
        PetType::Cat,
        PetType::Dog,
        PetType::Rabbit,
        PetType::Hamster,
        PetType::Dragon,
        PetType::Panda,
        PetType::Penguin,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PetType::Cat => "Kitten",
            PetType::Dog => "Puppy",
            PetType::Rabbit => "Bunny",
            PetType::Hamster => "Hamster",
            PetType::Dragon => "Little Dragon",
            PetType::Panda => "Panda Cub",
            PetType::Penguin => "Penguin Chick",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PetType::Cat => "🐱",
            PetType::Dog => "🐶",
            PetType::Rabbit => "🐰",
            PetType::Hamster => "🐹",
            PetType::Dragon => "🐲",
            PetType::Panda => "🐼",
            PetType::Penguin => "🐧",
        }
    }

    /// Parse a species name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| format!("{:?}", t).eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pet_id_uniqueness() {
        assert_ne!(PetId::new(), PetId::new());
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_player_id_display() {
        let id = PlayerId::new("alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(PlayerId::from("alice"), id);
    }

    #[test]
    fn test_pet_type_parse() {
        assert_eq!(PetType::parse("cat"), Some(PetType::Cat));
        assert_eq!(PetType::parse(" Dragon "), Some(PetType::Dragon));
        assert_eq!(PetType::parse("unicorn"), None);
    }

    #[test]
    fn test_pet_type_serde_snake_case() {
        let json = serde_json::to_string(&PetType::Penguin).unwrap();
        assert_eq!(json, "\"penguin\"");
    }
}
