//! Care actions: data-driven definitions and their executor

pub mod catalog;
pub mod executor;

pub use catalog::{
    ActionAvailability, ActionDefinition, Precondition, PreconditionKind, SleepTransition,
};
pub use executor::{AbsoluteProgress, ActionExecutor, ActionOutcome, PERFECT_CARE_THRESHOLD};
