//! Response definitions
//!
//! Represents responses to clients.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{JsonKvError, Result};

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Status line (`+OK`, `+PONG`)
    Simple(String),

    /// Error message (`-ERR ...`)
    Error(String),

    /// Payload; JSON-encoded for every command that returns a value
    Bulk(Bytes),

    /// Absent value
    Nil,

    /// Count or length
    Integer(i64),
}

impl Response {
    /// Create an OK response
    pub fn ok() -> Self {
        Response::Simple("OK".to_string())
    }

    /// Create a PONG response
    pub fn pong() -> Self {
        Response::Simple("PONG".to_string())
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Response::Error(message.to_string())
    }

    /// Create a bulk response holding `value` encoded as JSON
    pub fn json(value: &Value) -> Result<Self> {
        Ok(Response::Bulk(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// Create a bulk response for a present value, nil otherwise
    pub fn json_or_nil(value: Option<&Value>) -> Result<Self> {
        match value {
            Some(value) => Self::json(value),
            None => Ok(Response::Nil),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Decode a bulk payload as JSON (`None` for nil)
    pub fn to_json(&self) -> Result<Option<Value>> {
        match self {
            Response::Bulk(payload) => Ok(Some(serde_json::from_slice(payload)?)),
            Response::Nil => Ok(None),
            Response::Error(message) => Err(JsonKvError::Protocol(format!(
                "server error: {}",
                message
            ))),
            other => Err(JsonKvError::Protocol(format!(
                "expected a bulk reply, got {:?}",
                other
            ))),
        }
    }
}
