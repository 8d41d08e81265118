//! Socket transport errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Socket closed")]
    Closed,

    #[error("Send failed: {0}")]
    SendFailed(String),
}
