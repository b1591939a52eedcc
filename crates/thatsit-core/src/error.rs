//! Core error types for thatsit-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in the
//! core is fatal: every error here is either recoverable by the user
//! (wrong password, malformed input) or a rejected contract violation.

use std::path::PathBuf;
use thiserror::Error;

use crate::lock::Phase;

/// Core error type for operations that cross more than one boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Setup input rejected at the boundary
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Lock controller errors
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Errors returned by [`LockController`](crate::LockController) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The unlock attempt did not match the stored password.
    #[error("wrong password")]
    WrongPassword,

    /// `start` was called with an empty password.
    #[error("unlock password must not be empty")]
    EmptyPassword,

    /// The operation is not valid in the current phase.
    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Setup input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cutoff time could not be parsed as `HH:MM`
    #[error("Invalid cutoff time '{input}': expected HH:MM")]
    InvalidTime { input: String },

    /// Numeric field outside its allowed range
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Password length does not match the required length
    #[error("Password must be exactly {expected} characters.")]
    PasswordLength { expected: usize, actual: usize },

    /// Clipboard paste into a protected field
    #[error("No copy-pasting allowed! You have to commit to this.")]
    PasteRejected,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
