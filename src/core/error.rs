use thiserror::Error;

use crate::catalog::CatalogError;
use crate::core::types::SessionId;

/// Caller-visible failures of engine operations.
///
/// Every variant is recoverable. Operations validate fully before mutating,
/// so an `Err` always means nothing was changed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PetError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Cannot do that right now: {0}")]
    PreconditionFailed(String),

    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session {0} has already finished")]
    AlreadyTerminal(SessionId),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PetError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        PetError::NotFound { kind, id: id.to_string() }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        PetError::PreconditionFailed(reason.into())
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        PetError::InvalidInput(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PetError>;
