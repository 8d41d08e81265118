//! Request handling for bound HTTP routes.

use std::collections::HashMap;

use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use remoting_core::{RequestContext, RpcHandler, dispatch};
use remoting_protocols::{HttpMethod, RpcRequest, RpcResponse};

use crate::state::RemoteState;

/// Tag on the 400 envelope returned for requests that could not be read.
const MALFORMED_REQUEST_KIND: &str = "MalformedRequest";

/// Tag on the 403 envelope returned when the access guard refuses a caller.
const ACCESS_DENIED_KIND: &str = "AccessDenied";

/// Query parameters, or the reason the query string could not be parsed.
pub type QueryParams = Result<HashMap<String, String>, String>;

/// Serve one call to the route `(method, path)`.
///
/// GET takes its `id` from the query string and has no parameters; every
/// other verb reads an [`RpcRequest`] from the body. Once a request has
/// been read the answer is always `200` with an [`RpcResponse`], whether
/// the call succeeded or not. Callers refused by the access guard get `403`
/// before anything is read.
pub async fn handle_call(
    state: &RemoteState,
    handler: &RpcHandler,
    method: HttpMethod,
    path: &str,
    headers: &HeaderMap,
    query: &QueryParams,
    body: &[u8],
) -> Response {
    let ctx = context_from_headers(RequestContext::http(method, path), headers);
    if !state.allows(&ctx) {
        warn!(method = %method, path = %path, "Access denied");
        return access_denied();
    }

    let request = match read_request(method, query, body) {
        Ok(request) => request,
        Err(message) => {
            warn!(method = %method, path = %path, "Rejected request: {}", message);
            let envelope = RpcResponse::failure(0, message, Some(MALFORMED_REQUEST_KIND.to_string()));
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };

    let response = dispatch(handler, ctx, request, state.call_timeout).await;
    (StatusCode::OK, Json(response)).into_response()
}

/// `403` with an `AccessDenied` envelope.
pub(crate) fn access_denied() -> Response {
    let envelope = RpcResponse::failure(0, "Access denied", Some(ACCESS_DENIED_KIND.to_string()));
    (StatusCode::FORBIDDEN, Json(envelope)).into_response()
}

fn read_request(method: HttpMethod, query: &QueryParams, body: &[u8]) -> Result<RpcRequest, String> {
    if !method.carries_body() {
        let query = query
            .as_ref()
            .map_err(|e| format!("Invalid query string: {}", e))?;
        return query
            .get("id")
            .ok_or_else(|| "Missing id query parameter".to_string())?
            .parse::<i64>()
            .map(RpcRequest::bare)
            .map_err(|e| format!("Invalid id query parameter: {}", e));
    }
    serde_json::from_slice(body).map_err(|e| format!("Malformed request body: {}", e))
}

/// Copy the UTF-8 headers of a request into `ctx`.
pub(crate) fn context_from_headers(mut ctx: RequestContext, headers: &HeaderMap) -> RequestContext {
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            ctx.headers.insert(name.as_str().to_string(), value.to_string());
        }
    }
    ctx
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_get_reads_query_id() {
        let query = Ok(HashMap::from([("id".to_string(), "42".to_string())]));
        let request = read_request(HttpMethod::Get, &query, b"ignored").unwrap();
        assert_eq!(request, RpcRequest::bare(42));
    }

    #[test]
    fn test_get_without_id() {
        let err = read_request(HttpMethod::Get, &Ok(HashMap::new()), b"").unwrap_err();
        assert!(err.contains("Missing id"));
    }

    #[test]
    fn test_get_with_unparsable_query() {
        let query = Err("Failed to deserialize query string".to_string());
        let err = read_request(HttpMethod::Get, &query, b"").unwrap_err();
        assert!(err.starts_with("Invalid query string"));
    }

    #[test]
    fn test_post_ignores_query() {
        let query = Err("Failed to deserialize query string".to_string());
        let body = br#"{"id":3,"method":"/rpc/a","params":[]}"#;
        assert_eq!(read_request(HttpMethod::Post, &query, body).unwrap().id, 3);
    }

    #[test]
    fn test_get_with_bad_id() {
        let query = Ok(HashMap::from([("id".to_string(), "seven".to_string())]));
        assert!(read_request(HttpMethod::Get, &query, b"").is_err());
    }

    #[test]
    fn test_post_reads_body() {
        let body = br#"{"id":7,"method":"/rpc/add","params":["3","4"]}"#;
        let request = read_request(HttpMethod::Post, &Ok(HashMap::new()), body).unwrap();
        assert_eq!(request.id, 7);
        assert_eq!(request.params.len(), 2);
    }

    #[test]
    fn test_post_malformed_body() {
        let err = read_request(HttpMethod::Put, &Ok(HashMap::new()), b"{not json").unwrap_err();
        assert!(err.starts_with("Malformed request body"));
    }

    #[tokio::test]
    async fn test_access_denied_envelope() {
        let response = access_denied();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: RpcResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope.id, 0);
        assert_eq!(envelope.exception_type.as_deref(), Some("AccessDenied"));
    }

    #[test]
    fn test_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Session", HeaderValue::from_static("abc"));
        let ctx = context_from_headers(RequestContext::http(HttpMethod::Post, "/rpc/a"), &headers);
        assert_eq!(ctx.header("x-session"), Some("abc"));
        assert_eq!(ctx.path, "/rpc/a");
    }
}
