//! Running a bound handler for one request.

use std::any::Any;
use std::time::Duration;

use tracing::{debug, error};

use remoting_protocols::{CallError, RpcRequest, RpcResponse};

use crate::binder::RpcHandler;
use crate::context::RequestContext;

/// Execute `request` against `handler` and build its response.
///
/// The call runs on its own task, so a panicking service becomes an error
/// response instead of taking the connection down. With a `timeout` the
/// task is aborted once the limit passes. Failures other than parameter
/// mismatches and expected service errors are logged.
pub async fn dispatch(
    handler: &RpcHandler,
    ctx: RequestContext,
    request: RpcRequest,
    timeout: Option<Duration>,
) -> RpcResponse {
    let id = request.id;
    let route = ctx.path.clone();
    let mut task = tokio::spawn(handler(ctx, request.params));

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                task.abort();
                Ok(Err(CallError::Timeout(limit)))
            }
        },
        None => task.await,
    };

    let outcome = match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(CallError::Panicked(panic_message(e.into_panic()))),
        Err(e) => Err(CallError::Panicked(e.to_string())),
    };

    match outcome {
        Ok(result) => {
            debug!(route = %route, id, "Call succeeded");
            RpcResponse::success(id, result)
        }
        Err(err) => {
            if !err.is_expected() {
                error!(
                    route = %route,
                    id,
                    kind = err.kind().unwrap_or_default(),
                    "Call failed: {}",
                    err
                );
            }
            err.into_response(id)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
