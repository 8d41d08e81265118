//! Arity-dispatched binding of typed functions.
//!
//! A bound function takes the service instance followed by 0 to 6 typed
//! parameters and returns a future of `Result<R, ServiceError>`. Binding
//! turns it into an [`RpcHandler`] that accepts the raw positional `params`
//! of an envelope. The parameter codecs are resolved once, here, rather
//! than on each call.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;

use remoting_protocols::{CallError, CodecError, ServiceError};

use crate::codec::{CodecTable, RemoteParam};
use crate::context::RequestContext;

/// Builds the service instance for one request.
pub type ServiceFactory<S> = Arc<dyn Fn(&RequestContext) -> S + Send + Sync>;

/// Uniform handler stored in the route registry. Resolves to the JSON
/// encoding of the function's result.
pub type RpcHandler =
    Arc<dyn Fn(RequestContext, Vec<Option<String>>) -> BoxFuture<'static, Result<String, CallError>> + Send + Sync>;

/// A function that can be bound as a remote call on service `S`.
///
/// `Args` is the tuple of parameter types and only serves to keep the
/// per-arity implementations apart.
pub trait RemoteFn<S, Args>: Send + Sync + 'static {
    /// Number of parameters after the service.
    const ARITY: usize;

    fn into_handler(self, factory: ServiceFactory<S>, codecs: &CodecTable) -> RpcHandler;
}

macro_rules! impl_remote_fn {
    ($arity:expr; $(($ty:ident, $codec:ident, $value:ident, $idx:tt)),*) => {
        impl<S, F, Fut, R, $($ty,)*> RemoteFn<S, ($($ty,)*)> for F
        where
            S: Send + 'static,
            F: Fn(S, $($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<R, ServiceError>> + Send + 'static,
            R: Serialize + 'static,
            $($ty: RemoteParam,)*
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn into_handler(self, factory: ServiceFactory<S>, codecs: &CodecTable) -> RpcHandler {
                let function = Arc::new(self);
                $(let $codec = codecs.resolve::<$ty>();)*

                Arc::new(move |ctx: RequestContext, params: Vec<Option<String>>| {
                    let function = function.clone();
                    let factory = factory.clone();
                    $(let $codec = $codec.clone();)*

                    async move {
                        if params.len() != $arity {
                            return Err(CallError::InvalidParameters {
                                expected: $arity,
                                actual: params.len(),
                            });
                        }
                        $(
                            let $value = $codec
                                .decode(params[$idx].as_deref())
                                .map_err(|error| CallError::Decode { position: $idx, error })?;
                        )*

                        let service = factory(&ctx);
                        let result = function(service, $($value),*).await?;
                        serde_json::to_string(&result)
                            .map_err(|e| CallError::Encode(CodecError::encode::<R>(e)))
                    }
                    .boxed()
                })
            }
        }
    };
}

impl_remote_fn!(0;);
impl_remote_fn!(1; (A1, c1, v1, 0));
impl_remote_fn!(2; (A1, c1, v1, 0), (A2, c2, v2, 1));
impl_remote_fn!(3; (A1, c1, v1, 0), (A2, c2, v2, 1), (A3, c3, v3, 2));
impl_remote_fn!(4; (A1, c1, v1, 0), (A2, c2, v2, 1), (A3, c3, v3, 2), (A4, c4, v4, 3));
impl_remote_fn!(
    5;
    (A1, c1, v1, 0),
    (A2, c2, v2, 1),
    (A3, c3, v3, 2),
    (A4, c4, v4, 3),
    (A5, c5, v5, 4)
);
impl_remote_fn!(
    6;
    (A1, c1, v1, 0),
    (A2, c2, v2, 1),
    (A3, c3, v3, 2),
    (A4, c4, v4, 3),
    (A5, c5, v5, 4),
    (A6, c6, v6, 5)
);

/// Arity of `F` when bound with argument tuple `Args`.
pub fn arity_of<S, Args, F: RemoteFn<S, Args>>(_function: &F) -> usize {
    F::ARITY
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
