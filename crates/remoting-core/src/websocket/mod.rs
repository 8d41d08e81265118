//! Duplex streaming over a single socket.
//!
//! Each connection is served by four bounded queues and four tasks:
//!
//! ```text
//! socket ──on_message──▶ raw in ──decode──▶ requests ──▶ handler
//! socket ◀──send_text── raw out ◀──encode── responses ◀──┘
//! ```
//!
//! The transport only ever sees text frames and a [`SocketSink`]; it has no
//! knowledge of the request and response types. Closure travels along the
//! pipeline: a closed socket ends the request stream, and a handler that
//! finishes ends the response stream, which closes the socket.

mod session;
mod sink;
mod stream;

pub use session::{Connection, SessionOptions, SessionState};
pub use sink::SocketSink;
pub use stream::{RequestStream, ResponseSink};

use std::sync::Arc;

use crate::context::RequestContext;

/// Opens a session for a freshly accepted connection.
pub type WsEndpoint =
    Arc<dyn Fn(RequestContext, Box<dyn SocketSink>, SessionOptions) -> Connection + Send + Sync>;
