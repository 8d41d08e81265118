//! HTTP binding of bound routes.

mod handler;
mod routes;

pub(crate) use handler::{access_denied, context_from_headers};
pub use handler::{QueryParams, handle_call};
pub use routes::apply_routes;
