use crate::message::{RpcHeaderMapExt, RpcMessageHeader};
use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri};
use http_body_util::Full;
use std::time::Duration;

/// Per-request timeouts applied by the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestTimeouts {
    /// Upper bound for the whole exchange.
    pub transfer: Duration,
    /// Upper bound for any gap between received body chunks.
    pub inactivity: Duration,
}

impl RequestTimeouts {
    /// Expands a single request timeout into transfer and inactivity bounds.
    ///
    /// The connect timeout belongs to the transport's connector and is set
    /// when the transport is built.
    pub fn from_request_timeout(timeout: Duration) -> Self {
        Self {
            transfer: timeout,
            inactivity: timeout,
        }
    }
}

/// The outbound HTTP request of one call.
///
/// It is built once per [`RpcCall`](crate::call::RpcCall) and then mutated in
/// place by every retry and redirect, so the headers accumulated along the
/// way travel with each following hop.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    timeouts: Option<RequestTimeouts>,
    cache_key: Option<String>,
}

impl OutboundRequest {
    /// Creates a POST request. Calls are always POSTed.
    pub fn post(uri: Uri, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::POST,
            uri,
            headers: HeaderMap::new(),
            body: body.into(),
            timeouts: None,
            cache_key: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: Uri) {
        self.uri = uri;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn rpc_header(&self, header: RpcMessageHeader) -> Option<&str> {
        self.headers.get_rpc(header)
    }

    pub fn set_rpc_header(&mut self, header: RpcMessageHeader, value: &str) {
        self.headers.set_rpc(header, value);
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn timeouts(&self) -> Option<RequestTimeouts> {
        self.timeouts
    }

    pub fn set_timeouts(&mut self, timeouts: RequestTimeouts) {
        self.timeouts = Some(timeouts);
    }

    /// The request-to-target cache key this request was routed under, if any.
    ///
    /// This is the key as built, which may differ from the header copy once
    /// it has been made header-safe.
    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    /// Records the cache key and forwards it as the `requestToUriCacheKey`
    /// header.
    pub fn set_cache_key(&mut self, cache_key: impl Into<String>) {
        let cache_key = cache_key.into();
        self.set_rpc_header(RpcMessageHeader::RequestToUriCacheKey, &cache_key);
        self.cache_key = Some(cache_key);
    }

    /// Builds a sendable [`http::Request`]. The timeouts, if set, ride along
    /// as a request extension.
    pub fn to_http_request(&self) -> Request<Full<Bytes>> {
        let mut request = Request::new(Full::new(self.body.clone()));
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();

        if let Some(timeouts) = self.timeouts {
            request.extensions_mut().insert(timeouts);
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout_bounds_transfer_and_inactivity() {
        let timeouts = RequestTimeouts::from_request_timeout(Duration::from_millis(1000));
        assert_eq!(timeouts.transfer, Duration::from_millis(1000));
        assert_eq!(timeouts.inactivity, Duration::from_millis(1000));
    }

    #[test]
    fn test_cache_key_keeps_non_ascii_characters() {
        let mut request = OutboundRequest::post(Uri::from_static("http://127.0.0.1:8080"), "[]");
        request.set_cache_key("rpc.local->ClientRepository::getClientName_Žofie");

        assert_eq!(
            request.cache_key(),
            Some("rpc.local->ClientRepository::getClientName_Žofie")
        );
        assert_eq!(
            request.rpc_header(RpcMessageHeader::RequestToUriCacheKey),
            Some("rpc.local->ClientRepository::getClientName_?ofie")
        );
    }

    #[test]
    fn test_to_http_request_carries_headers_and_timeouts() {
        let mut request = OutboundRequest::post(Uri::from_static("http://127.0.0.1:8080"), "[]");
        request.set_rpc_header(RpcMessageHeader::RpcRemoteMethodName, "add");
        request.set_timeouts(RequestTimeouts::from_request_timeout(Duration::from_secs(2)));

        let http_request = request.to_http_request();
        assert_eq!(http_request.method(), &Method::POST);
        assert_eq!(http_request.headers()["rpc-method-name"], "add");
        assert_eq!(
            http_request.extensions().get::<RequestTimeouts>().map(|t| t.transfer),
            Some(Duration::from_secs(2))
        );
    }
}
