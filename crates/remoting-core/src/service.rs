//! Binding a service's functions to routes.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use remoting_protocols::{
    BindError, HttpMethod, RemoteData, RemoteFilter, RemoteOption, RemoteSorter, ServiceError,
};

use crate::binder::{RemoteFn, ServiceFactory};
use crate::codec::{CodecTable, RemoteParam};
use crate::context::RequestContext;
use crate::registry::{Registries, RouteKey, RouteRegistry, WsRouteRegistry};
use crate::websocket::{
    Connection, RequestStream, ResponseSink, SessionOptions, SocketSink, WsEndpoint,
};

pub const DEFAULT_HTTP_PREFIX: &str = "/rpc";
pub const DEFAULT_WS_PREFIX: &str = "/rpcws";

/// Collects the routes of one service.
///
/// A manager is built during startup, its functions bound one by one, and
/// then turned into [`Registries`] for the transport to mount. Every call
/// builds a fresh service instance through the factory.
///
/// Routes without an explicit name get `route<Name><n>`, where `n` counts
/// the generated names of this manager only.
pub struct ServiceManager<S> {
    name: String,
    factory: ServiceFactory<S>,
    codecs: CodecTable,
    http_prefix: String,
    ws_prefix: String,
    generated: usize,
    registries: Registries,
}

impl<S: Send + 'static> ServiceManager<S> {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&RequestContext) -> S + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            codecs: CodecTable::new(),
            http_prefix: DEFAULT_HTTP_PREFIX.to_string(),
            ws_prefix: DEFAULT_WS_PREFIX.to_string(),
            generated: 0,
            registries: Registries::new(),
        }
    }

    /// Mount prefixes for routes bound from now on.
    pub fn with_prefixes(mut self, http: impl Into<String>, ws: impl Into<String>) -> Self {
        self.http_prefix = trim_prefix(http.into());
        self.ws_prefix = trim_prefix(ws.into());
        self
    }

    /// Codec overrides for functions bound from now on.
    pub fn with_codecs(mut self, codecs: CodecTable) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn codecs_mut(&mut self) -> &mut CodecTable {
        &mut self.codecs
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind `function` as an HTTP route and return its path.
    ///
    /// GET requests carry no parameters, so only zero-arity functions may be
    /// bound to GET.
    pub fn bind<Args, F>(
        &mut self,
        method: HttpMethod,
        route: Option<&str>,
        function: F,
    ) -> Result<String, BindError>
    where
        F: RemoteFn<S, Args>,
    {
        if !method.carries_body() && F::ARITY > 0 {
            return Err(BindError::UnsupportedMethod {
                method,
                route: self.peek_path(&self.http_prefix, route),
                arity: F::ARITY,
            });
        }

        let path = self.peek_path(&self.http_prefix, route);
        let handler = function.into_handler(self.factory.clone(), &self.codecs);
        self.registries
            .routes
            .register(RouteKey::new(method, path.clone()), handler)?;
        self.consume_name(route);

        debug!(service = %self.name, method = %method, path = %path, arity = F::ARITY, "Bound route");
        Ok(path)
    }

    /// Bind a duplex stream handler as a WebSocket route and return its path.
    ///
    /// The handler is started once per accepted connection and owns it until
    /// it returns.
    pub fn bind_stream<Req, Res, F, Fut>(
        &mut self,
        route: Option<&str>,
        function: F,
    ) -> Result<String, BindError>
    where
        Req: RemoteParam,
        Res: Serialize + Send + 'static,
        F: Fn(S, RequestStream<Req>, ResponseSink<Res>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let path = self.peek_path(&self.ws_prefix, route);
        let function = Arc::new(function);
        let factory = self.factory.clone();
        let codec = self.codecs.resolve::<Req>();
        let endpoint: WsEndpoint = Arc::new(
            move |ctx: RequestContext, sink: Box<dyn SocketSink>, options: SessionOptions| {
                let service = factory(&ctx);
                let function = function.clone();
                let id = ctx.connection_id.clone().unwrap_or_default();
                Connection::open(
                    id,
                    service,
                    move |service: S, requests: RequestStream<Req>, responses: ResponseSink<Res>| {
                        function(service, requests, responses)
                    },
                    codec.clone(),
                    sink,
                    options,
                )
            },
        );
        self.registries.ws_routes.register(path.clone(), endpoint)?;
        self.consume_name(route);

        debug!(service = %self.name, path = %path, "Bound stream");
        Ok(path)
    }

    /// Bind a remote select source: `(search, initial, state)` to options.
    pub fn bind_select_remote<F, Fut>(
        &mut self,
        route: Option<&str>,
        function: F,
    ) -> Result<String, BindError>
    where
        F: Fn(S, Option<String>, Option<String>, Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<RemoteOption>, ServiceError>> + Send + 'static,
    {
        self.bind::<(Option<String>, Option<String>, Option<String>), F>(
            HttpMethod::Post,
            route,
            function,
        )
    }

    /// Bind a remote tabulator source:
    /// `(page, size, filters, sorters, state)` to one page of rows.
    pub fn bind_tabulator_remote<T, F, Fut>(
        &mut self,
        route: Option<&str>,
        function: F,
    ) -> Result<String, BindError>
    where
        T: Serialize + Send + 'static,
        F: Fn(
                S,
                Option<i32>,
                Option<i32>,
                Option<Vec<RemoteFilter>>,
                Option<Vec<RemoteSorter>>,
                Option<String>,
            ) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<RemoteData<T>, ServiceError>> + Send + 'static,
    {
        self.bind::<(
            Option<i32>,
            Option<i32>,
            Option<Vec<RemoteFilter>>,
            Option<Vec<RemoteSorter>>,
            Option<String>,
        ), F>(HttpMethod::Post, route, function)
    }

    pub fn routes(&self) -> &RouteRegistry {
        &self.registries.routes
    }

    pub fn ws_routes(&self) -> &WsRouteRegistry {
        &self.registries.ws_routes
    }

    pub fn into_registries(self) -> Registries {
        self.registries
    }

    /// Path a bind under `prefix` would get.
    fn peek_path(&self, prefix: &str, route: Option<&str>) -> String {
        match route {
            Some(route) => join_path(prefix, route),
            None => join_path(prefix, &format!("route{}{}", self.name, self.generated)),
        }
    }

    /// Generated names are only used up by a successful bind.
    fn consume_name(&mut self, route: Option<&str>) {
        if route.is_none() {
            self.generated += 1;
        }
    }
}

fn trim_prefix(prefix: String) -> String {
    prefix.trim_end_matches('/').to_string()
}

fn join_path(prefix: &str, route: &str) -> String {
    format!("{}/{}", prefix, route.trim_start_matches('/'))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
