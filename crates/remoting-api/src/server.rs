//! Remote server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use remoting_config::Config;
use remoting_core::{Registries, RequestContext, ServiceManager, SessionOptions};

use crate::error::ApiError;
use crate::http::apply_routes;
use crate::state::{AccessGuard, RemoteState};

/// Remote server configuration.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub call_timeout: Option<Duration>,
    pub session: SessionOptions,
}

impl ServerOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            call_timeout: config.rpc.call_timeout(),
            session: SessionOptions {
                channel_capacity: config.websocket.channel_capacity,
            },
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            call_timeout: None,
            session: SessionOptions::default(),
        }
    }
}

/// Serves the routes of every mounted service.
pub struct RemoteServer {
    options: ServerOptions,
    registries: Registries,
    guard: Option<AccessGuard>,
}

impl RemoteServer {
    pub fn new(options: ServerOptions) -> Self {
        Self {
            options,
            registries: Registries::new(),
            guard: None,
        }
    }

    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    /// Admit only callers for which `guard` returns true.
    ///
    /// Denied HTTP calls and upgrades get `403` with an `AccessDenied`
    /// envelope and never reach a service.
    pub fn with_access_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Add the routes bound on `manager`.
    ///
    /// Fails, mounting nothing, if any route is already taken by an earlier
    /// service.
    pub fn mount<S: Send + 'static>(&mut self, manager: ServiceManager<S>) -> Result<(), ApiError> {
        let name = manager.name().to_string();
        let registries = manager.into_registries();
        let (routes, streams) = (registries.routes.len(), registries.ws_routes.len());
        self.mount_registries(registries)?;
        info!(service = %name, routes, streams, "Mounted service");
        Ok(())
    }

    pub fn mount_registries(&mut self, registries: Registries) -> Result<(), ApiError> {
        let http_paths: Vec<String> = self
            .registries
            .routes
            .keys()
            .chain(registries.routes.keys())
            .map(|key| key.path.clone())
            .collect();
        let conflict = self
            .registries
            .ws_routes
            .keys()
            .chain(registries.ws_routes.keys())
            .find(|path| http_paths.contains(path));
        if let Some(path) = conflict {
            return Err(ApiError::RouteConflict(path.clone()));
        }

        self.registries.merge(registries)?;
        Ok(())
    }

    /// Freeze the route tables and build the router.
    pub fn into_router(self) -> (Router, Arc<RemoteState>) {
        let state = Arc::new(
            RemoteState::new(self.registries)
                .with_call_timeout(self.options.call_timeout)
                .with_session(self.options.session.clone())
                .with_guard(self.guard),
        );
        let router = apply_routes(Router::new(), state.clone()).layer(TraceLayer::new_for_http());
        (router, state)
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), ApiError> {
        let addr_text = self.options.addr();
        let addr: SocketAddr = addr_text.parse().map_err(|e: std::net::AddrParseError| {
            ApiError::InvalidAddress {
                addr: addr_text.clone(),
                message: e.to_string(),
            }
        })?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// Live WebSocket sessions are closed before the server stops.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ApiError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (router, state) = self.into_router();
        let connections = state.connections.clone();

        info!("Remote server listening on {}", listener.local_addr()?);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                connections.close_all().await;
            })
            .await?;

        info!("Remote server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use remoting_core::{RequestStream, ResponseSink};
    use remoting_protocols::{HttpMethod, ServiceError};

    use super::*;

    #[derive(Clone)]
    struct Svc;

    impl Svc {
        async fn ping(self) -> Result<String, ServiceError> {
            Ok("pong".to_string())
        }
    }

    fn manager(name: &str) -> ServiceManager<Svc> {
        ServiceManager::new(name, |_ctx: &RequestContext| Svc)
    }

    #[test]
    fn test_server_options_default() {
        let options = ServerOptions::default();
        assert_eq!(options.addr(), "127.0.0.1:8080");
        assert!(options.call_timeout.is_none());
    }

    #[test]
    fn test_server_options_from_config() {
        let mut config = Config::default();
        config.server.port = 9000;
        config.rpc.call_timeout_secs = Some(5);
        config.websocket.channel_capacity = 8;

        let options = ServerOptions::from_config(&config);
        assert_eq!(options.addr(), "127.0.0.1:9000");
        assert_eq!(options.call_timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.session.channel_capacity, 8);
    }

    #[test]
    fn test_mount_rejects_cross_service_duplicates() {
        let mut server = RemoteServer::new(ServerOptions::default());

        let mut first = manager("A");
        first.bind(HttpMethod::Get, Some("ping"), |s: Svc| s.ping()).unwrap();
        server.mount(first).unwrap();

        let mut second = manager("B");
        second.bind(HttpMethod::Get, Some("ping"), |s: Svc| s.ping()).unwrap();
        assert!(matches!(server.mount(second), Err(ApiError::Registry(_))));
    }

    #[test]
    fn test_mount_rejects_http_ws_overlap() {
        let mut server = RemoteServer::new(ServerOptions::default());

        let mut first = manager("A");
        first.bind(HttpMethod::Get, Some("shared"), |s: Svc| s.ping()).unwrap();
        server.mount(first).unwrap();

        let mut second = manager("B").with_prefixes("/elsewhere", "/rpc");
        second
            .bind_stream(
                Some("shared"),
                |_s: Svc, _rq: RequestStream<String>, _rs: ResponseSink<String>| async {},
            )
            .unwrap();
        assert!(matches!(server.mount(second), Err(ApiError::RouteConflict(p)) if p == "/rpc/shared"));
    }

    #[test]
    fn test_into_router_freezes_tables() {
        let mut server = RemoteServer::new(ServerOptions::new("0.0.0.0", 3000));
        let mut svc = manager("A");
        svc.bind(HttpMethod::Get, Some("ping"), |s: Svc| s.ping()).unwrap();
        server.mount(svc).unwrap();

        let (_router, state) = server.into_router();
        assert_eq!(state.routes.len(), 1);
        assert_eq!(state.connections.connection_count(), 0);
        assert!(state.allows(&RequestContext::default()));
    }

    #[test]
    fn test_access_guard_reaches_state() {
        let server = RemoteServer::new(ServerOptions::default())
            .with_access_guard(|ctx: &RequestContext| ctx.header("x-token") == Some("t"));

        let (_router, state) = server.into_router();
        assert!(!state.allows(&RequestContext::default()));
        let ctx = RequestContext::http(HttpMethod::Get, "/rpc/ping").with_header("X-Token", "t");
        assert!(state.allows(&ctx));
    }
}
