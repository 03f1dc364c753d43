//! Error types for jsonkv
//!
//! Provides a unified error type for all operations. The `Display` text of
//! each variant is what clients see in an `-ERR` reply.

use thiserror::Error;

/// Result type alias using JsonKvError
pub type Result<T> = std::result::Result<T, JsonKvError>;

/// Unified error type for jsonkv operations
#[derive(Debug, Error)]
pub enum JsonKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("no such key: {0}")]
    NoSuchKey(String),

    // -------------------------------------------------------------------------
    // Path Errors
    // -------------------------------------------------------------------------
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("no such field: {0}")]
    NoSuchField(String),

    #[error("invalid type, expected object")]
    ExpectedObject,

    #[error("invalid type, expected array")]
    ExpectedArray,

    #[error("invalid type, expected number")]
    ExpectedNumber,

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("array is empty")]
    EmptyArray,

    #[error("increment overflows a 64-bit integer")]
    NumericOverflow,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for JsonKvError {
    fn from(err: serde_json::Error) -> Self {
        JsonKvError::Serialization(err.to_string())
    }
}
