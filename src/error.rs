use thiserror::Error;

/// Errors raised by task operations.
///
/// A missing task is not an error: lookups return `Option` and mutations
/// return `bool`.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}'. Use YYYY-MM-DD or +N/-N days.")]
    InvalidDueDate(String),

    #[error("Invalid priority '{0}'. Use low, medium, high or 1-3.")]
    InvalidPriority(String),

    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
