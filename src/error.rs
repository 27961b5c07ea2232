use std::sync::Arc;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Shared by every caller that awaited the same failed initialization.
    #[error("Storage initialization failed: {0}")]
    Init(Arc<AppError>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// True when SQLite rejected a statement on a constraint
    /// (foreign key, primary key, NOT NULL).
    #[allow(dead_code)]
    pub fn is_constraint_violation(&self) -> bool {
        let sqlite_error = match self {
            AppError::Database(e) => e,
            AppError::Connection(tokio_rusqlite::Error::Rusqlite(e)) => e,
            AppError::Init(inner) => return inner.is_constraint_violation(),
            _ => return false,
        };

        matches!(
            sqlite_error.sqlite_error_code(),
            Some(ErrorCode::ConstraintViolation)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
