//! Error types for the terminbot crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire terminbot application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TerminError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Dialogue orchestration error (invalid stack operation, bad step index)
    #[error("Dialog error: {0}")]
    Dialog(String),

    /// Recognizer error (prediction call failed or returned an unusable payload)
    #[error("Recognizer error: {0}")]
    Recognizer(String),

    /// Date expression error (malformed TIMEX-style string)
    #[error("Date expression error: {0}")]
    DateExpression(String),

    /// Activity delivery error (transport layer)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Conversation state access error (store layer)
    #[error("State error: {0}")]
    State(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TerminError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Dialog error
    pub fn dialog(message: impl Into<String>) -> Self {
        Self::Dialog(message.into())
    }

    /// Creates a Recognizer error
    pub fn recognizer(message: impl Into<String>) -> Self {
        Self::Recognizer(message.into())
    }

    /// Creates a DateExpression error
    pub fn date_expression(message: impl Into<String>) -> Self {
        Self::DateExpression(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a State error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Recognizer error
    pub fn is_recognizer(&self) -> bool {
        matches!(self, Self::Recognizer(_))
    }

    /// Check if this is a Config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<serde_json::Error> for TerminError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for TerminError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, TerminError>`.
pub type Result<T> = std::result::Result<T, TerminError>;
