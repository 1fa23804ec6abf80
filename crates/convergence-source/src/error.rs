use thiserror::Error;

/// Errors raised while reading percentages from the data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The configured query is unusable (e.g. returns no columns).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
