use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeekplanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),
}

pub type Result<T> = std::result::Result<T, WeekplanError>;
