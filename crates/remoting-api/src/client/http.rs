//! HTTP client for bound routes.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::de::DeserializeOwned;
use tracing::debug;

use remoting_core::RemoteParam;
use remoting_protocols::{HttpMethod, RpcRequest, RpcResponse};

use super::stream::{self, StreamReceiver, StreamSender};
use crate::error::RemoteError;

/// Calls routes on one remote server.
///
/// Request ids increase monotonically per client, starting at 1.
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    next_id: AtomicI64,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send a call and return the raw response envelope.
    pub async fn call_raw(
        &self,
        method: HttpMethod,
        path: &str,
        params: Vec<Option<String>>,
    ) -> Result<RpcResponse, RemoteError> {
        let id = self.next_id();
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, id, "Calling remote route");

        let builder = if method.carries_body() {
            self.http
                .request(reqwest_method(method), &url)
                .json(&RpcRequest::new(id, path, params))
        } else {
            self.http.get(&url).query(&[("id", id)])
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str::<RpcResponse>(&body).map_err(|_| RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Call a route and decode its result as `R`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Vec<Option<String>>,
    ) -> Result<R, RemoteError> {
        decode_result(self.call_raw(method, path, params).await?)
    }

    /// Open the stream route at `path`.
    pub async fn open_stream<Req, Res>(
        &self,
        path: &str,
    ) -> Result<(StreamSender<Req>, StreamReceiver<Res>), RemoteError>
    where
        Req: RemoteParam,
        Res: DeserializeOwned,
    {
        stream::connect(&ws_url(&self.base_url, path), path).await
    }
}

pub(crate) fn decode_result<R: DeserializeOwned>(response: RpcResponse) -> Result<R, RemoteError> {
    match (response.result, response.error) {
        (_, Some(message)) => Err(RemoteError::Remote {
            message,
            exception_type: response.exception_type,
        }),
        (Some(result), None) => Ok(serde_json::from_str(&result)?),
        (None, None) => Err(RemoteError::EmptyResponse),
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn ws_url(base_url: &str, path: &str) -> String {
    let base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base_url.to_string()
    };
    format!("{}{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = RemoteClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_ids_increase() {
        let client = RemoteClient::new("http://localhost:8080");
        assert_eq!(client.next_id(), 1);
        assert_eq!(client.next_id(), 2);
        assert_eq!(client.next_id(), 3);
    }

    #[test]
    fn test_ws_url() {
        assert_eq!(ws_url("http://h:1", "/rpcws/echo"), "ws://h:1/rpcws/echo");
        assert_eq!(ws_url("https://h", "/rpcws/echo"), "wss://h/rpcws/echo");
        assert_eq!(ws_url("ws://h", "/x"), "ws://h/x");
    }

    #[test]
    fn test_decode_success() {
        let value: i32 = decode_result(RpcResponse::success(7, "7")).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_decode_remote_failure() {
        let err = decode_result::<i32>(RpcResponse::invalid_parameters(7)).unwrap_err();
        assert!(matches!(err, RemoteError::Remote { ref message, .. } if message == "Invalid parameters"));
    }

    #[test]
    fn test_decode_empty() {
        let response = RpcResponse {
            id: 1,
            result: None,
            error: None,
            exception_type: None,
        };
        assert!(matches!(decode_result::<i32>(response), Err(RemoteError::EmptyResponse)));
    }
}
