//! WebSocket route table, keyed by path alone.

use super::OrderedRegistry;
use crate::websocket::WsEndpoint;

pub type WsRouteRegistry = OrderedRegistry<String, WsEndpoint>;
