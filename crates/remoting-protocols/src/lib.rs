//! # Remoting Protocols
//!
//! Wire-level definitions shared by the server and client halves of the
//! remoting layer. Contains only data types and errors - no I/O.
//!
//! ## Contents
//!
//! - [`RpcRequest`] / [`RpcResponse`] - the JSON envelope carried by HTTP
//!   bodies and WebSocket text frames
//! - [`HttpMethod`] - the verbs a route can be bound to
//! - [`RemoteOption`], [`RemoteData`], [`RemoteFilter`], [`RemoteSorter`] -
//!   payloads of the select and tabulator data-source bindings
//! - [`error`] - the error taxonomy used across the workspace

pub mod envelope;
pub mod error;
pub mod method;
pub mod remote;

pub use envelope::{RpcRequest, RpcResponse, INVALID_PARAMETERS, STREAM_RESPONSE_ID};
pub use error::{
    BindError, CallError, CodecError, RegistryError, ServiceError, TransportError,
};
pub use method::HttpMethod;
pub use remote::{RemoteData, RemoteFilter, RemoteOption, RemoteSorter};
