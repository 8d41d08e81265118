//! Transport and client error types.

use remoting_protocols::{CodecError, RegistryError};
use thiserror::Error;

/// Server-side transport errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Listen address could not be parsed.
    #[error("Invalid address {addr}: {message}")]
    InvalidAddress { addr: String, message: String },

    /// Two mounted services claim the same route.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A path is bound as both an HTTP and a WebSocket route.
    #[error("Path bound to both HTTP and WebSocket: {0}")]
    RouteConflict(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors seen by a client calling a remote route.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The call reached the service and failed there.
    #[error("{message}")]
    Remote {
        message: String,
        exception_type: Option<String>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than a response envelope.
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Cannot decode result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Response carried neither result nor error")]
    EmptyResponse,
}

impl RemoteError {
    /// Classification tag of a remote failure, if any.
    pub fn exception_type(&self) -> Option<&str> {
        match self {
            Self::Remote { exception_type, .. } => exception_type.as_deref(),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RemoteError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::Remote {
            message: "Invalid parameters".to_string(),
            exception_type: None,
        };
        assert_eq!(err.to_string(), "Invalid parameters");
        assert_eq!(err.exception_type(), None);
    }

    #[test]
    fn test_remote_error_exception_type() {
        let err = RemoteError::Remote {
            message: "boom".to_string(),
            exception_type: Some("UnexpectedError".to_string()),
        };
        assert_eq!(err.exception_type(), Some("UnexpectedError"));
    }

    #[test]
    fn test_api_error_from_registry() {
        let err = ApiError::from(RegistryError::DuplicateRoute("POST /rpc/a".to_string()));
        assert!(err.to_string().contains("POST /rpc/a"));
    }
}
