//! Shared state behind the router.

use std::sync::Arc;
use std::time::Duration;

use remoting_core::{Registries, RequestContext, RouteRegistry, SessionOptions, WsRouteRegistry};

use crate::websocket::WsConnectionManager;

/// Decides whether a caller may reach a route at all.
///
/// Runs on the request context before any HTTP call is read and before a
/// WebSocket upgrade is accepted.
pub type AccessGuard = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Everything a request handler needs, frozen once serving starts.
pub struct RemoteState {
    pub routes: RouteRegistry,
    pub ws_routes: WsRouteRegistry,
    pub connections: Arc<WsConnectionManager>,
    pub call_timeout: Option<Duration>,
    pub session: SessionOptions,
    pub guard: Option<AccessGuard>,
}

impl RemoteState {
    pub fn new(registries: Registries) -> Self {
        Self {
            routes: registries.routes,
            ws_routes: registries.ws_routes,
            connections: Arc::new(WsConnectionManager::new()),
            call_timeout: None,
            session: SessionOptions::default(),
            guard: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_session(mut self, session: SessionOptions) -> Self {
        self.session = session;
        self
    }

    pub fn with_guard(mut self, guard: Option<AccessGuard>) -> Self {
        self.guard = guard;
        self
    }

    /// True when no guard is set or the guard admits `ctx`.
    pub fn allows(&self, ctx: &RequestContext) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(ctx))
    }
}
