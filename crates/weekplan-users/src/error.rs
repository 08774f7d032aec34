use thiserror::Error;

/// All user-layer errors. Kept separate from the HTTP error type so the
/// gateway decides which status each one maps to.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Another thread panicked while holding the store connection.
    #[error("store connection lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, UserError>;
