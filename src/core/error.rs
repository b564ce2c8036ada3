use thiserror::Error;

/// Unified error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not obtain a connection from the pool.
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API request failed.
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// JSON payload could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;
