//! Mounting registry contents on an axum router.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Query, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::routing::{MethodFilter, MethodRouter, get};
use tracing::debug;

use remoting_protocols::HttpMethod;

use crate::http::handler::handle_call;
use crate::state::RemoteState;
use crate::websocket::upgrade;

/// Mount every route of `state` on `router`.
///
/// HTTP routes go first, in registration order, with all verbs of a path
/// sharing one method router. WebSocket routes follow.
///
/// ## Route Structure
///
/// ```text
/// <http_prefix>/<route>   - one RpcRequest per call, RpcResponse back
/// <ws_prefix>/<route>     - upgrade; RpcRequest frames in, id 0 RpcResponse frames out
/// ```
pub fn apply_routes(mut router: Router, state: Arc<RemoteState>) -> Router {
    for (path, methods) in state.routes.paths() {
        let mut method_router = MethodRouter::new();
        for method in methods {
            let Ok(handler) = state.routes.resolve_route(method, &path).cloned() else {
                continue;
            };
            let call_state = state.clone();
            let route = path.clone();
            method_router = method_router.on(
                method_filter(method),
                move |headers: HeaderMap,
                      query: Result<Query<HashMap<String, String>>, QueryRejection>,
                      body: Bytes| async move {
                    let query = query.map(|Query(query)| query).map_err(|e| e.body_text());
                    handle_call(&call_state, &handler, method, &route, &headers, &query, &body).await
                },
            );
            debug!(method = %method, path = %path, "Mounted route");
        }
        router = router.route(&path, method_router);
    }

    for path in state.ws_routes.keys() {
        let ws_state = state.clone();
        let route = path.clone();
        router = router.route(
            path,
            get(move |ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>, headers: HeaderMap| async move {
                upgrade(ws, headers, ws_state, route).await
            }),
        );
        debug!(path = %path, "Mounted WebSocket route");
    }

    router
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
