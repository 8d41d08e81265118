//! Call errors, raised between receiving a request and producing its result.

use std::time::Duration;

use thiserror::Error;

use super::{CodecError, ServiceError};
use crate::envelope::RpcResponse;

#[derive(Debug, Error)]
pub enum CallError {
    #[error("Invalid parameters: expected {expected}, got {actual}")]
    InvalidParameters { expected: usize, actual: usize },

    #[error("Parameter {position}: {error}")]
    Decode { position: usize, error: CodecError },

    #[error("Result: {0}")]
    Encode(CodecError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl CallError {
    /// Classification tag surfaced to the client as `exceptionType`.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::InvalidParameters { .. } => None,
            Self::Decode { .. } => Some("DeserializationError"),
            Self::Encode(_) => Some("SerializationError"),
            Self::Service(e) => Some(e.kind()),
            Self::Timeout(_) => Some("Timeout"),
            Self::Panicked(_) => Some("Panic"),
        }
    }

    /// Whether the failure is a normal outcome that must not be logged as a
    /// server fault.
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidParameters { .. } => true,
            Self::Service(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Convert into the response envelope for the request with `id`.
    pub fn into_response(self, id: i64) -> RpcResponse {
        if let Self::InvalidParameters { .. } = self {
            return RpcResponse::invalid_parameters(id);
        }
        let kind = self.kind().map(str::to_string);
        let message = match &self {
            Self::Service(e) => e.to_string(),
            Self::Decode { error, .. } | Self::Encode(error) => error.to_string(),
            other => other.to_string(),
        };
        let message = if message.is_empty() {
            "Error".to_string()
        } else {
            message
        };
        RpcResponse::failure(id, message, kind)
    }
}
