//! Per-connection session: the four queues and the tasks that pump them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use remoting_protocols::{RpcRequest, RpcResponse, STREAM_RESPONSE_ID};

use super::sink::SocketSink;
use super::stream::{RequestStream, ResponseSink};
use crate::codec::{Codec, RemoteParam};

/// How long a socket close may take once the session is shutting down.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Frames flow in both directions.
    Open,
    /// Teardown has started; queued frames are still being flushed.
    Draining,
    /// Every task has finished and the socket has been closed.
    Closed,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Capacity of each of the four queues.
    pub channel_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
        }
    }
}

struct Shared {
    raw_in: Mutex<Option<mpsc::Sender<String>>>,
    shutdown: CancellationToken,
    state: watch::Sender<SessionState>,
}

impl Shared {
    fn begin_draining(&self) {
        self.state.send_if_modified(|state| {
            if *state == SessionState::Open {
                *state = SessionState::Draining;
                true
            } else {
                false
            }
        });
    }

    /// Stop accepting frames from the socket.
    fn close_inbound(&self) {
        self.raw_in.lock().take();
        self.begin_draining();
    }
}

/// The transport's handle on one live session.
///
/// Cheap to clone; all clones refer to the same session.
#[derive(Clone)]
pub struct Connection {
    id: String,
    shared: Arc<Shared>,
}

impl Connection {
    /// Start a session and spawn its tasks.
    ///
    /// `handler` receives `service` with the typed ends of the session and
    /// runs until it returns. Frames written to `sink` are JSON response
    /// envelopes with id 0.
    pub fn open<S, Req, Res, F, Fut>(
        id: impl Into<String>,
        service: S,
        handler: F,
        request_codec: Codec<Req>,
        sink: Box<dyn SocketSink>,
        options: SessionOptions,
    ) -> Self
    where
        S: Send + 'static,
        Req: RemoteParam,
        Res: Serialize + Send + 'static,
        F: FnOnce(S, RequestStream<Req>, ResponseSink<Res>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        let capacity = options.channel_capacity.max(1);

        let (raw_in_tx, raw_in_rx) = mpsc::channel::<String>(capacity);
        let (raw_out_tx, raw_out_rx) = mpsc::channel::<String>(capacity);
        let (request_tx, request_rx) = mpsc::channel::<Req>(capacity);
        let (response_tx, response_rx) = mpsc::channel::<Res>(capacity);
        let (state, _) = watch::channel(SessionState::Open);

        let shared = Arc::new(Shared {
            raw_in: Mutex::new(Some(raw_in_tx)),
            shutdown: CancellationToken::new(),
            state,
        });

        let tasks = vec![
            tokio::spawn(outbound_pump(id.clone(), raw_out_rx, sink, shared.clone())),
            tokio::spawn(decode_pump(
                id.clone(),
                raw_in_rx,
                request_tx,
                request_codec,
                shared.clone(),
            )),
            tokio::spawn(encode_pump(id.clone(), response_rx, raw_out_tx, shared.clone())),
            tokio::spawn(handler(
                service,
                RequestStream::new(request_rx),
                ResponseSink::new(response_tx),
            )),
        ];
        tokio::spawn(supervise(id.clone(), tasks, shared.clone()));

        debug!(connection = %id, capacity, "Session opened");
        Self { id, shared }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state.borrow()
    }

    /// Feed one text frame read from the socket.
    ///
    /// Waits while the inbound queue is full. Frames arriving after the
    /// session stopped accepting input are dropped.
    pub async fn on_message(&self, text: String) {
        let sender = self.shared.raw_in.lock().clone();
        match sender {
            Some(sender) => {
                if sender.send(text).await.is_err() {
                    debug!(connection = %self.id, "Inbound queue closed, frame dropped");
                }
            }
            None => debug!(connection = %self.id, "Session closing, frame dropped"),
        }
    }

    /// The socket closed from the transport side. Idempotent.
    ///
    /// Ends the request stream and stops writing to the socket; frames
    /// already queued for output are discarded.
    pub fn on_close(&self) {
        self.shared.close_inbound();
        self.shared.shutdown.cancel();
    }

    /// Resolves once the session is fully torn down.
    pub async fn closed(&self) {
        let mut state = self.shared.state.subscribe();
        let _ = state.wait_for(|s| *s == SessionState::Closed).await;
    }
}

/// raw out -> socket. Ends the session once the outbound queue is drained.
///
/// A write in flight when the session shuts down is abandoned, and the final
/// close gets [`CLOSE_GRACE`] after shutdown before it is abandoned too, so a
/// peer that stopped reading cannot hold the session open.
async fn outbound_pump(
    id: String,
    mut raw_out: mpsc::Receiver<String>,
    mut sink: Box<dyn SocketSink>,
    shared: Arc<Shared>,
) {
    let mut writable = true;
    let mut shutting_down = false;

    loop {
        tokio::select! {
            biased;
            _ = shared.shutdown.cancelled(), if !shutting_down => {
                shutting_down = true;
                writable = false;
                raw_out.close();
            }
            frame = raw_out.recv() => {
                let Some(frame) = frame else { break };
                if !writable {
                    continue;
                }
                tokio::select! {
                    biased;
                    _ = shared.shutdown.cancelled() => {
                        debug!(connection = %id, "Write abandoned on shutdown");
                        shutting_down = true;
                        writable = false;
                        raw_out.close();
                    }
                    result = sink.send_text(frame) => {
                        if let Err(e) = result {
                            debug!(connection = %id, "Socket write failed: {}", e);
                            writable = false;
                            raw_out.close();
                        }
                    }
                }
            }
        }
    }

    let grace = async {
        shared.shutdown.cancelled().await;
        tokio::time::sleep(CLOSE_GRACE).await;
    };
    tokio::select! {
        result = sink.close() => {
            if let Err(e) = result {
                debug!(connection = %id, "Socket already closed: {}", e);
            }
        }
        _ = grace => warn!(connection = %id, "Socket close abandoned"),
    }
    shared.close_inbound();
}

/// raw in -> requests. Only envelopes carrying exactly one parameter are
/// forwarded; anything else is dropped.
async fn decode_pump<Req: RemoteParam>(
    id: String,
    mut raw_in: mpsc::Receiver<String>,
    requests: mpsc::Sender<Req>,
    codec: Codec<Req>,
    shared: Arc<Shared>,
) {
    while let Some(frame) = raw_in.recv().await {
        let request: RpcRequest = match serde_json::from_str(&frame) {
            Ok(request) => request,
            Err(e) => {
                warn!(connection = %id, "Dropping malformed frame: {}", e);
                continue;
            }
        };
        if request.params.len() != 1 {
            debug!(
                connection = %id,
                params = request.params.len(),
                "Dropping frame without exactly one parameter"
            );
            continue;
        }
        let item = match codec.decode(request.params[0].as_deref()) {
            Ok(item) => item,
            Err(e) => {
                warn!(connection = %id, "Dropping undecodable frame: {}", e);
                continue;
            }
        };
        if requests.send(item).await.is_err() {
            debug!(connection = %id, "Handler stopped reading requests");
            break;
        }
    }
    shared.begin_draining();
}

/// responses -> raw out, one envelope per item.
async fn encode_pump<Res: Serialize>(
    id: String,
    mut responses: mpsc::Receiver<Res>,
    raw_out: mpsc::Sender<String>,
    shared: Arc<Shared>,
) {
    while let Some(item) = responses.recv().await {
        let frame = match encode_frame(&item) {
            Ok(frame) => frame,
            Err(e) => {
                error!(connection = %id, "Cannot encode response item: {}", e);
                continue;
            }
        };
        if raw_out.send(frame).await.is_err() {
            break;
        }
    }
    shared.begin_draining();
}

fn encode_frame<Res: Serialize>(item: &Res) -> Result<String, serde_json::Error> {
    let result = serde_json::to_string(item)?;
    serde_json::to_string(&RpcResponse::success(STREAM_RESPONSE_ID, result))
}

async fn supervise(id: String, tasks: Vec<JoinHandle<()>>, shared: Arc<Shared>) {
    for task in tasks {
        if let Err(e) = task.await {
            error!(connection = %id, "Session task failed: {}", e);
        }
    }
    shared.state.send_replace(SessionState::Closed);
    debug!(connection = %id, "Session closed");
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
