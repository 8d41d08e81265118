//! Client stubs for calling bound routes.
//!
//! ```ignore
//! let client = RemoteClient::new("http://127.0.0.1:8080");
//! let sum: i32 = client.call(HttpMethod::Post, "/rpc/add", params![3, 4]?).await?;
//! ```

mod http;
mod params;
mod stream;

pub use http::RemoteClient;
pub use stream::{StreamReceiver, StreamSender};
