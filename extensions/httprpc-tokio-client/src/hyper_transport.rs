use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use httprpc::BoxError;
use httprpc::call::OutboundRequest;
use httprpc_service_caller::{ResponseBody, RpcTransport, TransportError, TransportResponse};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;

/// [`RpcTransport`] over a pooled hyper HTTP/1 client.
///
/// The client never retries on its own. Retrying is decided by the call
/// engine, which needs to know whether a request reached the server.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        connector.set_connect_timeout(connect_timeout);

        let mut builder = Client::builder(TokioExecutor::new());
        builder.timer(TokioTimer::new()).retry_canceled_requests(false);

        Self {
            client: builder.build(connector),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

fn into_response_body(body: Incoming) -> ResponseBody {
    body.map_err(|err| Box::new(err) as BoxError).boxed()
}

#[async_trait::async_trait]
impl RpcTransport for HyperTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let timeouts = request.timeouts();
        let response = self.client.request(request.to_http_request());

        let response = match timeouts {
            Some(timeouts) => tokio::time::timeout(timeouts.transfer, response)
                .await
                .map_err(|_| TransportError::TimedOut(timeouts.transfer))?,
            None => response.await,
        };

        let response = response.map_err(|err| {
            if err.is_connect() {
                TransportError::Unprocessed(Box::new(err))
            } else {
                TransportError::Failed(Box::new(err))
            }
        })?;

        tracing::trace!(status = %response.status(), uri = %request.uri(), "received rpc response head");

        Ok(response.map(into_response_body))
    }
}
