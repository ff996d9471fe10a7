use crate::TransportError;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use httprpc::BoxError;
use httprpc::call::OutboundRequest;

pub type ResponseBody = BoxBody<Bytes, BoxError>;

pub type TransportResponse = http::Response<ResponseBody>;

/// Sends one outbound request and returns the response head with a
/// streaming body.
///
/// Implementations apply the request's
/// [`RequestTimeouts`](httprpc::call::RequestTimeouts) and must report
/// requests that never reached the server as [`TransportError::Unprocessed`].
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// Wraps fully buffered bytes as a [`ResponseBody`].
pub fn full_response_body(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed()
}
