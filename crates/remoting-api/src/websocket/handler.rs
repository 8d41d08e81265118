//! WebSocket upgrade and socket loop.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use remoting_core::{RequestContext, SocketSink, WsEndpoint};
use remoting_protocols::TransportError;

use crate::http::{access_denied, context_from_headers};
use crate::state::RemoteState;

/// Accept the upgrade for the stream route at `path`.
///
/// The access guard is consulted before the upgrade request itself is
/// checked, so a refused caller gets `403` whatever it sent.
pub(crate) async fn upgrade(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    headers: HeaderMap,
    state: Arc<RemoteState>,
    path: String,
) -> Response {
    let Some(endpoint) = state.ws_routes.get(&path).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let connection_id = Uuid::new_v4().to_string();
    let ctx = context_from_headers(RequestContext::websocket(&path, &connection_id), &headers);
    if !state.allows(&ctx) {
        warn!(path = %path, "Upgrade denied");
        return access_denied();
    }

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| serve_socket(socket, endpoint, ctx, connection_id, state, path)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Write half of an axum socket.
struct AxumSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl SocketSink for AxumSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sender
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.sender
            .close()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

/// Run one connection until either side closes it.
async fn serve_socket(
    socket: WebSocket,
    endpoint: WsEndpoint,
    ctx: RequestContext,
    connection_id: String,
    state: Arc<RemoteState>,
    path: String,
) {
    let (sender, mut receiver) = socket.split();
    let connection = endpoint(ctx, Box::new(AxumSink { sender }), state.session.clone());
    state.connections.add(connection.clone());
    info!(connection = %connection_id, path = %path, "WebSocket connected");

    loop {
        tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => connection.on_message(text.to_string()).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => debug!(connection = %connection_id, "Ignoring non-text frame"),
                Some(Err(e)) => {
                    warn!(connection = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            },
            _ = connection.closed() => break,
        }
    }

    connection.on_close();
    connection.closed().await;
    state.connections.remove(&connection_id);
    info!(connection = %connection_id, "WebSocket disconnected");
}
