//! Shared Error Types
//!
//! Errors that can occur while decoding data shared by the REST client and
//! the push channel: JSON payloads, wire packets and event names.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures
//! - `ProtocolError` - Malformed Engine.IO / Socket.IO packets
//! - `UnknownEvent` - Push-channel event name outside the catalog
//!
//! # Usage
//!
//! ```rust
//! use boardsync::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "List title cannot be empty");
//! assert!(error.to_string().contains("title"));
//! ```
use thiserror::Error;

/// Shared error types for decoding and validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Malformed wire packet
    #[error("Protocol error: {message}")]
    ProtocolError {
        /// Human-readable error message
        message: String,
    },

    /// Event name not present in the board event catalog
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// The event name as received
        name: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Create a new unknown event error
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
