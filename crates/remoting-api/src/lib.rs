//! # Remoting API
//!
//! axum transport for services bound with `remoting-core`, and the client
//! stubs that call them.
//!
//! ## Architecture
//!
//! ```text
//!  RemoteClient ──HTTP──▶ ┌────────────────────────────────────┐
//!                         │ RemoteServer (axum + TraceLayer)   │
//!                         │  /rpc/*   ─▶ http::handle_call ─▶ dispatch
//!  open_stream ───WS────▶ │  /rpcws/* ─▶ websocket::serve_socket ─▶ Connection
//!                         └────────────────────────────────────┘
//! ```
//!
//! Services are bound on a `ServiceManager`, mounted on a [`RemoteServer`],
//! and served. The route tables are frozen when the router is built.

pub mod client;
pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod websocket;

pub use client::{RemoteClient, StreamReceiver, StreamSender};
pub use error::{ApiError, RemoteError};
pub use http::apply_routes;
pub use server::{RemoteServer, ServerOptions};
pub use state::{AccessGuard, RemoteState};
pub use websocket::WsConnectionManager;

#[doc(hidden)]
pub use remoting_core::encode_param;
