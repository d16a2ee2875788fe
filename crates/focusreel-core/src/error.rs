//! Core error types for focusreel-core.
//!
//! Errors fall into two camps. Corrupt or missing persisted state is never
//! an error at all: the component that reads it falls back to a safe default
//! and logs the recovery. Everything else -- failed writes, unparseable
//! config, invalid user input -- surfaces through this hierarchy.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusreel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
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

    /// Filesystem error resolving or creating the data directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Session duration must be a positive number of minutes
    #[error("Invalid focus duration: {minutes} minutes")]
    InvalidDuration { minutes: i64 },

    /// Reflection text below the minimum length after trimming
    #[error("Reflection too short: {actual} characters (need at least {required})")]
    ReflectionTooShort { required: usize, actual: usize },

    /// Goal list is at capacity
    #[error("Goal limit reached ({max} goals)")]
    GoalLimitReached { max: usize },

    /// A required text field was empty after trimming
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// No watch session is active
    #[error("No active watch session")]
    NoActiveSession,

    /// The active session has not completed yet
    #[error("Session has not completed yet")]
    SessionNotCompleted,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
