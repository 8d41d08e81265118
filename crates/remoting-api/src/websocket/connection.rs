//! WebSocket connection management.

use dashmap::DashMap;

use remoting_core::Connection;

/// Live sessions keyed by connection id.
pub struct WsConnectionManager {
    connections: DashMap<String, Connection>,
}

impl WsConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn add(&self, connection: Connection) {
        self.connections
            .insert(connection.id().to_string(), connection);
    }

    pub fn remove(&self, id: &str) {
        self.connections.remove(id);
    }

    pub fn get(&self, id: &str) -> Option<Connection> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Close every live session and wait for each to finish tearing down.
    pub async fn close_all(&self) {
        let live: Vec<Connection> = self
            .connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for connection in &live {
            connection.on_close();
        }
        for connection in live {
            connection.closed().await;
            self.connections.remove(connection.id());
        }
    }
}

impl Default for WsConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use remoting_core::{CodecTable, RequestStream, ResponseSink, SessionOptions, SocketSink};
    use remoting_protocols::TransportError;

    use super::*;

    struct NullSink;

    #[async_trait]
    impl SocketSink for NullSink {
        async fn send_text(&mut self, _text: String) -> Result<(), TransportError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn open(id: &str) -> Connection {
        Connection::open(
            id,
            (),
            |_s: (), mut requests: RequestStream<String>, _responses: ResponseSink<String>| async move {
                while requests.recv().await.is_some() {}
            },
            CodecTable::new().resolve::<String>(),
            Box::new(NullSink),
            SessionOptions::default(),
        )
    }

    #[test]
    fn test_ws_connection_manager_new() {
        let manager = WsConnectionManager::new();
        assert_eq!(manager.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_ws_connection_manager_add_remove() {
        let manager = WsConnectionManager::new();
        manager.add(open("conn-1"));
        assert_eq!(manager.connection_count(), 1);
        assert!(manager.get("conn-1").is_some());

        manager.remove("conn-1");
        assert_eq!(manager.connection_count(), 0);
        assert!(manager.get("conn-1").is_none());
    }

    #[tokio::test]
    async fn test_close_all() {
        let manager = WsConnectionManager::new();
        let first = open("conn-1");
        let second = open("conn-2");
        manager.add(first.clone());
        manager.add(second.clone());

        manager.close_all().await;
        assert_eq!(manager.connection_count(), 0);
        assert_eq!(first.state(), remoting_core::SessionState::Closed);
        assert_eq!(second.state(), remoting_core::SessionState::Closed);
    }
}
