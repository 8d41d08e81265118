//! Typed ends of a session handed to the stream handler.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use remoting_protocols::TransportError;

/// Decoded incoming items, in arrival order.
///
/// Yields `None` once the client side is closed and every buffered item has
/// been consumed.
#[derive(Debug)]
pub struct RequestStream<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> RequestStream<T> {
    pub(crate) fn new(rx: mpsc::Receiver<T>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Stop accepting items. Already buffered items can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl<T> Stream for RequestStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Outgoing items. Each one becomes a response frame with id 0.
///
/// Dropping every clone of the sink ends the response stream, which in turn
/// closes the socket once queued frames are written.
#[derive(Debug)]
pub struct ResponseSink<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for ResponseSink<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> ResponseSink<T> {
    pub(crate) fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx }
    }

    /// Queue an item, waiting while the queue is full.
    pub async fn send(&self, item: T) -> Result<(), TransportError> {
        self.tx.send(item).await.map_err(|_| TransportError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once nothing will read from this sink any more.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn test_request_stream_yields_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = RequestStream::new(rx);
        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        drop(tx);

        let items: Vec<i32> = (&mut stream).collect().await;
        assert_eq!(items, vec![1, 2]);
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_response_sink_reports_closed() {
        let (tx, rx) = mpsc::channel::<u8>(1);
        let sink = ResponseSink::new(tx);
        assert!(!sink.is_closed());
        drop(rx);
        assert!(sink.is_closed());
        assert_eq!(sink.send(1).await, Err(TransportError::Closed));
    }
}
