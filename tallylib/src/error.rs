//! Single error type for the public API.

use crate::model::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("please select a ledger")]
    MissingLedger,

    #[error("ledger already exists: {0}")]
    DuplicateLedger(String),

    #[error("unknown ledger: {0}")]
    UnknownLedger(String),

    #[error("favorite already exists: {0}")]
    DuplicateFavorite(String),

    #[error("not a favorite: {0}")]
    UnknownFavorite(String),

    #[error("favorites list is full ({0} max)")]
    FavoritesFull(usize),

    #[error("name must not be empty")]
    EmptyName,

    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("save failed for {key}: {reason}")]
    Persist { key: &'static str, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl TallyError {
    /// Validation failures are rejected before any state changes.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TallyError::MissingLedger
                | TallyError::DuplicateLedger(_)
                | TallyError::UnknownLedger(_)
                | TallyError::DuplicateFavorite(_)
                | TallyError::UnknownFavorite(_)
                | TallyError::FavoritesFull(_)
                | TallyError::EmptyName
                | TallyError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
