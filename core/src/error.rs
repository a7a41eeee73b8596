//! Error types for the pets API client.
//!
//! # Design
//! A failed call is one of a closed set of shapes, so callers can tell a
//! validation rejection (show it on the form, let the user resubmit) apart
//! from a transport failure or an unexpected status without inspecting
//! payloads. `NotFound` keeps its own variant because the view reacts to it
//! differently from other statuses.

use thiserror::Error;

use crate::http::TransportError;
use crate::types::ValidationErrors;

/// Errors returned by `PetClient` parse methods and `PetApi` calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server rejected the payload with per-field messages.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The server returned 404: the requested pet does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status with a body that is not a
    /// validation error set.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The validation messages, when this is a validation rejection.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
