use thiserror::Error;

/// Errors that can occur during schedule operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// No schedule row with this id.
    #[error("Schedule with ID {id} Not Found")]
    NotFound { id: i64 },

    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another thread panicked while holding the store connection.
    #[error("store connection lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
