//! Outbound half of a socket as seen by a session.

use async_trait::async_trait;

use remoting_protocols::TransportError;

/// Where a session writes its text frames.
///
/// Implemented by each transport over its socket's write half.
#[async_trait]
pub trait SocketSink: Send {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the socket. Called once, after the last frame.
    async fn close(&mut self) -> Result<(), TransportError>;
}
