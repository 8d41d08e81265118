//! WebSocket client for stream routes.

use std::marker::PhantomData;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use remoting_core::{RemoteParam, encode_param};
use remoting_protocols::{RpcRequest, RpcResponse};

use super::http::decode_result;
use crate::error::RemoteError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub(crate) async fn connect<Req, Res>(
    url: &str,
    path: &str,
) -> Result<(StreamSender<Req>, StreamReceiver<Res>), RemoteError>
where
    Req: RemoteParam,
    Res: DeserializeOwned,
{
    let (socket, _response) = connect_async(url).await?;
    debug!(url = %url, "Stream connected");
    let (sink, stream) = socket.split();
    Ok((
        StreamSender {
            sink,
            path: path.to_string(),
            next_id: 1,
            _items: PhantomData,
        },
        StreamReceiver {
            stream,
            _items: PhantomData,
        },
    ))
}

/// Sending half of a stream: one request frame per item.
pub struct StreamSender<Req> {
    sink: SplitSink<Socket, Message>,
    path: String,
    next_id: i64,
    _items: PhantomData<fn(Req)>,
}

impl<Req: RemoteParam> StreamSender<Req> {
    pub async fn send(&mut self, item: &Req) -> Result<(), RemoteError> {
        let request = RpcRequest::new(self.next_id, self.path.clone(), vec![encode_param(item)?]);
        self.next_id += 1;
        let frame = serde_json::to_string(&request)?;
        self.sink.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    /// Close the socket. The server ends the request stream in response.
    pub async fn close(&mut self) -> Result<(), RemoteError> {
        self.sink.close().await?;
        Ok(())
    }
}

/// Receiving half of a stream.
pub struct StreamReceiver<Res> {
    stream: SplitStream<Socket>,
    _items: PhantomData<fn() -> Res>,
}

impl<Res: DeserializeOwned> StreamReceiver<Res> {
    /// Next item, or `None` once the server closed the stream.
    pub async fn recv(&mut self) -> Option<Result<Res, RemoteError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => {
                    let item = serde_json::from_str::<RpcResponse>(text.as_str())
                        .map_err(RemoteError::from)
                        .and_then(decode_result);
                    return Some(item);
                }
                Ok(Message::Close(_))
                | Err(Error::ConnectionClosed)
                | Err(Error::AlreadyClosed) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
