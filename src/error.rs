//! Error types for validation, storage and panel operations.

use crate::models::RecordId;
use thiserror::Error;

/// Form input that cannot be saved. Nothing reaches the store.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Prize distribution must total 100% (currently {total}%)")]
    PrizeDistribution { total: i64 },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a whole number within its allowed range (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },
}

/// Failure reported by a record store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store is not available")]
    Unavailable,

    #[error("Tournament {0} not found")]
    NotFound(RecordId),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage quota exceeded ({needed} bytes needed, quota {quota})")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
