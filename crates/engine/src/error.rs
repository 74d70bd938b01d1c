//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientCredit`] thrown when a booking would exceed the available
//!   credit of the [`CreditEnvelope`].
//! - [`KeyNotFound`] thrown when a booking, customer or transaction is missing.
//! - [`BusinessRule`] thrown when a mutation breaks a ledger rule (e.g.
//!   deleting a customer that still has activity).
//! - [`InvalidStatus`] thrown when a stored payment or transaction status is
//!   not one of the known values.
//! - [`Database`] wraps storage failures.
//!
//!  [`InsufficientCredit`]: EngineError::InsufficientCredit
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`BusinessRule`]: EngineError::BusinessRule
//!  [`InvalidStatus`]: EngineError::InvalidStatus
//!  [`Database`]: EngineError::Database
//!  [`CreditEnvelope`]: super::CreditEnvelope
use sea_orm::DbErr;
use thiserror::Error;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(
        "Insufficient credit! Amount {requested} exceeds available credit {available} (short by {shortfall})"
    )]
    InsufficientCredit {
        available: Money,
        requested: Money,
        shortfall: Money,
    },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Business rule violated: {0}")]
    BusinessRule(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InsufficientCredit {
                    available: a1,
                    requested: r1,
                    shortfall: s1,
                },
                Self::InsufficientCredit {
                    available: a2,
                    requested: r2,
                    shortfall: s2,
                },
            ) => a1 == a2 && r1 == r2 && s1 == s2,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::BusinessRule(a), Self::BusinessRule(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
