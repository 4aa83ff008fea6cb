//! Engine error type.

use crate::store::StoreError;
use std::fmt;

/// Spendable currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Coins,
    Gems,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Coins => write!(f, "coins"),
            Currency::Gems => write!(f, "gems"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("insufficient {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: Currency,
        needed: u64,
        available: u64,
    },
    #[error("unknown achievement: {0}")]
    UnknownAchievement(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("player lock poisoned for user {0}")]
    LockPoisoned(String),
}
