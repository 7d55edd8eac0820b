use thiserror::Error;

/// Errors raised by the concept store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("concept {0} not found")]
    NotFound(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Quality grades run from 0 to 5.
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
