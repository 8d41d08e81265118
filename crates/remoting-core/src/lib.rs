//! # Remoting Core
//!
//! Transport-agnostic machinery that turns typed async functions into
//! JSON-RPC style endpoints.
//!
//! ## Pieces
//!
//! - [`registry`] - insertion-ordered route tables, read-only once serving starts
//! - [`codec`] - per-type parameter codecs, resolved once at bind time
//! - [`binder`] - adapts functions of 0 to 6 parameters to a uniform handler
//! - [`dispatch`] - runs a bound handler and converts the outcome to a response
//! - [`service`] - [`ServiceManager`], the entry point for binding a service
//! - [`websocket`] - the per-connection duplex multiplexer
//!
//! ## Example
//!
//! ```ignore
//! let mut manager = ServiceManager::new("Calculator", |_ctx: &RequestContext| Calculator);
//! manager.bind(HttpMethod::Post, Some("add"), |calc: Calculator, a: i32, b: i32| async move {
//!     calc.add(a, b).await
//! })?;
//! ```

pub mod binder;
pub mod codec;
pub mod context;
pub mod dispatch;
pub mod registry;
pub mod service;
pub mod websocket;

pub use binder::{RemoteFn, RpcHandler, ServiceFactory};
pub use codec::{Codec, CodecTable, RemoteParam, decode_param, encode_param};
pub use context::RequestContext;
pub use dispatch::dispatch;
pub use registry::{OrderedRegistry, Registries, RouteKey, RouteRegistry, WsRouteRegistry};
pub use service::ServiceManager;
pub use websocket::{
    Connection, RequestStream, ResponseSink, SessionOptions, SessionState, SocketSink, WsEndpoint,
};
