use thiserror::Error;

use crate::domain::ExpenseError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Errors the session reports to the user before reading the next command.
    /// Anything else ends the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Io(_))
    }
}
