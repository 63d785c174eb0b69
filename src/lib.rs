//! Pet Haven - virtual pet progression engine
//!
//! A pet's stats erode with real time and recover through care actions,
//! mini-games and the rewards of an achievement ledger. [`PetEngine`] is the
//! entry point; everything under it is synchronous and deterministic given
//! a clock and a seed.

pub mod achievements;
pub mod actions;
pub mod catalog;
pub mod core;
pub mod engine;
pub mod ledger;
pub mod minigame;
pub mod pet;

pub use crate::core::error::{PetError, Result};
pub use crate::engine::PetEngine;
