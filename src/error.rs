// src/error.rs

//! Unified error handling for the downloader.

use std::fmt;

use thiserror::Error;

/// Result type alias for downloader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request or body read failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A winners document record broke the expected shape
    #[error("Malformed winner record: {0}")]
    WinnerRecord(String),

    /// A per-contest job failed unexpectedly
    #[error("Job error for contest {contest}: {message}")]
    Job { contest: u32, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a winner record error.
    pub fn winner_record(message: impl Into<String>) -> Self {
        Self::WinnerRecord(message.into())
    }

    /// Create a job error for a contest.
    pub fn job(contest: u32, message: impl fmt::Display) -> Self {
        Self::Job {
            contest,
            message: message.to_string(),
        }
    }
}
