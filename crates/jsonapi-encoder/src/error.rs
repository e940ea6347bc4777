//! # Encoder Errors
//!
//! This module defines the error types used throughout the encoder.
//! Schemas report accessor failures as [`SchemaError`]; the encoder wraps them,
//! together with its own failures, into [`EncoderError`].

/// Boxed source error carried by a [`SchemaError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised by a schema accessor (id, attributes, relationships, links).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SchemaError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while encoding a document.
///
/// # Fatal vs. reported
/// Every variant except [`EncoderError::InvalidIncludePath`] aborts the encode call:
/// a half-built document is never returned. Invalid include paths are only
/// collected into [`EncodedDocument::warnings`](crate::EncodedDocument) and logged.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("No schema registered for type {type_name}")]
    UnmappedType { type_name: &'static str },

    #[error("Schema for '{resource_type}' failed: {source}")]
    SchemaEvaluation {
        resource_type: String,
        #[source]
        source: SchemaError,
    },

    #[error("Include path '{path}' does not match any relationship")]
    InvalidIncludePath { path: String },

    #[error("Relationship '{relationship}' of '{resource_type}' needs a self link but the resource has none")]
    MissingSelfLink {
        resource_type: String,
        relationship: String,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EncoderError {
    /// Returns `true` if the error aborts the encode call.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EncoderError::InvalidIncludePath { .. })
    }
}

pub type Result<T, E = EncoderError> = std::result::Result<T, E>;
