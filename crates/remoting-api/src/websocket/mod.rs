//! WebSocket binding of stream routes.
//!
//! The transport side is small: upgrade, adapt the write half to
//! [`SocketSink`](remoting_core::SocketSink), and feed text frames into the
//! session. Decoding, pumping and teardown live in `remoting-core`.

mod connection;
mod handler;

pub use connection::WsConnectionManager;
pub(crate) use handler::upgrade;
