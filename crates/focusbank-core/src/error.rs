//! Core error types for focusbank-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in the
//! core is fatal: callers are expected to surface the message and leave
//! state untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusbank-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Group session errors
    #[error("Group session error: {0}")]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Duration must be positive
    #[error("Invalid duration for '{field}': must be greater than zero")]
    NonPositiveDuration { field: String },

    /// Interval count must be at least one
    #[error("Invalid long break interval: must be at least 1")]
    ZeroInterval,

    /// Malformed HH:MM time-of-day string
    #[error("Invalid time of day '{value}': expected HH:MM")]
    BadTimeOfDay { value: String },

    /// Referenced an unknown task or subtask
    #[error("Unknown task: {id}")]
    UnknownTask { id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Group session errors. The message is surfaced to the user as `peer_error`
/// and local timer/task state is left untouched.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to create group session: {0}")]
    CreateFailed(String),

    #[error("Failed to join group session '{session_id}': {message}")]
    JoinFailed { session_id: String, message: String },

    #[error("No active group session")]
    NotConnected,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
