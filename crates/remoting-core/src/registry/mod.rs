//! Route registries.
//!
//! Registries are filled while services are bound and then frozen behind an
//! `Arc` for the lifetime of the server, so lookups need no locking.

mod base;
mod route;
mod websocket;

pub use base::OrderedRegistry;
pub use route::{RouteKey, RouteRegistry};
pub use websocket::WsRouteRegistry;

use remoting_protocols::RegistryError;

/// HTTP and WebSocket tables produced by one or more service managers.
#[derive(Default)]
pub struct Registries {
    pub routes: RouteRegistry,
    pub ws_routes: WsRouteRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb another set of tables.
    ///
    /// Nothing is merged when either table would collide.
    pub fn merge(&mut self, other: Registries) -> Result<(), RegistryError> {
        self.routes.check_disjoint(&other.routes)?;
        self.ws_routes.check_disjoint(&other.ws_routes)?;
        self.routes.merge(other.routes)?;
        self.ws_routes.merge(other.ws_routes)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.ws_routes.is_empty()
    }
}
