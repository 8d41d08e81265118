//! Per-request context handed to service factories.

use std::collections::HashMap;

use remoting_protocols::HttpMethod;

/// What the transport knows about the request being served.
///
/// Service factories receive this so a service instance can be built from
/// the caller's headers, session cookie and so on. WebSocket connections
/// carry no method but do carry a connection id.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Option<HttpMethod>,
    pub path: String,
    /// Header names are stored lowercase.
    pub headers: HashMap<String, String>,
    pub connection_id: Option<String>,
}

impl RequestContext {
    pub fn http(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn websocket(path: impl Into<String>, connection_id: impl Into<String>) -> Self {
        Self {
            method: None,
            path: path.into(),
            connection_id: Some(connection_id.into()),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_websocket(&self) -> bool {
        self.connection_id.is_some()
    }
}
