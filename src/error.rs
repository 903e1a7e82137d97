use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected at a boundary: negative or non-finite prices,
    /// timestamps out of order where order is required.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for errors that point at a defective upstream collaborator
    /// rather than a transient failure.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, AppError::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
