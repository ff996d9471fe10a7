use bytes::Bytes;
use futures::future::BoxFuture;
use http::Request;
use httprpc::RpcError;
use httprpc::responses::RpcHttpResponse;
use std::future::Future;
use std::sync::Arc;

/// An inbound request with its body already buffered.
pub type RpcRequest = Request<Bytes>;

/// Identifies one registered interceptor so it can be removed again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct InterceptorId(u64);

impl InterceptorId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InterceptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "interceptor-{}", self.0)
    }
}

/// What an interceptor decided for the request it was given.
#[derive(Debug)]
pub enum Intercept {
    /// Continue the pipeline with this (possibly rewritten) request.
    Continue(RpcRequest),
    /// Stop the pipeline and answer with this response.
    Respond(RpcHttpResponse),
}

/// A request interceptor.
///
/// An error of kind [`RpcErrorKind::Unprocessed`](httprpc::RpcErrorKind::Unprocessed)
/// is answered as an Unprocessed Throwable, every other error as
/// PossiblyProcessed.
pub type RequestInterceptor = Arc<
    dyn Fn(RpcRequest, InterceptorId) -> BoxFuture<'static, Result<Intercept, RpcError>>
        + Send
        + Sync,
>;

/// Boxes an async closure into a [`RequestInterceptor`].
pub fn request_interceptor<F, Fut>(interceptor: F) -> RequestInterceptor
where
    F: Fn(RpcRequest, InterceptorId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Intercept, RpcError>> + Send + 'static,
{
    Arc::new(
        move |request: RpcRequest, id: InterceptorId| -> BoxFuture<'static, Result<Intercept, RpcError>> {
            Box::pin(interceptor(request, id))
        },
    )
}
