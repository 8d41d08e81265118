//! Error types for the remoting layer.
//!
//! | Error | Raised when |
//! |---|---|
//! | [`RegistryError`] | registering a duplicate route, resolving an unknown one |
//! | [`BindError`] | wiring a function to a route fails at startup |
//! | [`CodecError`] | a parameter or result cannot be (de)serialized |
//! | [`ServiceError`] | a bound service function fails |
//! | [`CallError`] | anything goes wrong between receiving a request and producing its result |
//! | [`TransportError`] | the socket refuses a frame or a close |

mod bind;
mod call;
mod codec;
mod registry;
mod service;
mod transport;

pub use bind::*;
pub use call::*;
pub use codec::*;
pub use registry::*;
pub use service::*;
pub use transport::*;
