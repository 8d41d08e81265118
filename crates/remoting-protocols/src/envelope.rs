//! JSON-RPC style request/response envelope.

use serde::{Deserialize, Serialize};

/// Message placed in `error` when the parameter count does not match the
/// bound function's arity.
pub const INVALID_PARAMETERS: &str = "Invalid parameters";

/// Id stamped on every response frame of a WebSocket stream.
///
/// Streams are not request/response correlated, so the id carries no
/// meaning there.
pub const STREAM_RESPONSE_ID: i64 = 0;

/// A call to a bound route.
///
/// Each positional parameter is the string encoding of one argument, or
/// `null` for an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: i64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Vec<Option<String>>,
}

impl RpcRequest {
    pub fn new(id: i64, method: impl Into<String>, params: Vec<Option<String>>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Request shape used by GET routes: only the id travels, params are empty.
    pub fn bare(id: i64) -> Self {
        Self {
            id,
            method: String::new(),
            params: Vec::new(),
        }
    }
}

/// The outcome of a call.
///
/// Exactly one of `result` and `error` is populated. `exception_type` is a
/// classification tag clients can match on; it is left out of the JSON
/// entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: i64,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(
        rename = "exceptionType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exception_type: Option<String>,
}

impl RpcResponse {
    /// A successful response carrying a pre-serialized payload.
    pub fn success(id: i64, result: impl Into<String>) -> Self {
        Self {
            id,
            result: Some(result.into()),
            error: None,
            exception_type: None,
        }
    }

    /// A failed response with an optional classification tag.
    pub fn failure(id: i64, message: impl Into<String>, kind: Option<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
            exception_type: kind,
        }
    }

    /// Response for a parameter count mismatch.
    pub fn invalid_parameters(id: i64) -> Self {
        Self::failure(id, INVALID_PARAMETERS, None)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
