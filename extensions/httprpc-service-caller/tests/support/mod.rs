#![allow(dead_code)]

use example_httprpc_service_definition::{
    CLIENT_REPOSITORY_INTERFACE, ClientRepository, OBJECT_SENDER_INTERFACE, ObjectSender,
    SIMPLE_CALC_INTERFACE, SimpleCalc,
};
use http::Uri;
use httprpc::call::OutboundRequest;
use httprpc_service::{JsonSerializer, RpcRegistry};
use httprpc_service_caller::{
    DnsError, DnsRecordType, DnsResolver, RpcClient, RpcClientConfig, RpcTransport,
    TransportError, TransportResponse, full_response_body,
};
use httprpc_service_endpoint::RpcRequestHandler;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const ENTRY_HOST: &str = "rpc.local";
pub const FIRST_SERVER: &str = "10.0.0.1:8181";
pub const SECOND_SERVER: &str = "10.0.0.2:8182";

pub fn request_handler() -> Arc<RpcRequestHandler> {
    let registry = Arc::new(RpcRegistry::new());
    registry
        .register_remote_object(SIMPLE_CALC_INTERFACE, || SimpleCalc)
        .unwrap();
    registry
        .register_remote_object(CLIENT_REPOSITORY_INTERFACE, || ClientRepository)
        .unwrap();
    registry
        .register_remote_object(OBJECT_SENDER_INTERFACE, || ObjectSender)
        .unwrap();
    Arc::new(RpcRequestHandler::new(Arc::new(JsonSerializer), registry))
}

/// Routes requests straight into request handlers keyed by authority.
#[derive(Default)]
pub struct InMemoryTransport {
    routes: HashMap<String, Arc<RpcRequestHandler>>,
    sent: Mutex<Vec<OutboundRequest>>,
    unreachable_attempts: AtomicUsize,
    response_delay: Option<Duration>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, authority: &str, handler: Arc<RpcRequestHandler>) -> Self {
        self.routes.insert(authority.to_string(), handler);
        self
    }

    /// The next `attempts` requests fail as if no connection could be made.
    pub fn with_unreachable_attempts(self, attempts: usize) -> Self {
        self.unreachable_attempts.store(attempts, Ordering::SeqCst);
        self
    }

    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = Some(delay);
        self
    }

    pub fn set_unreachable_attempts(&self, attempts: usize) {
        self.unreachable_attempts.store(attempts, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    fn take_unreachable_attempt(&self) -> bool {
        self.unreachable_attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[async_trait::async_trait]
impl RpcTransport for InMemoryTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.sent.lock().push(request.clone());

        if self.take_unreachable_attempt() {
            return Err(TransportError::Unprocessed(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))));
        }

        let authority = request
            .uri()
            .authority()
            .map(|authority| authority.to_string())
            .unwrap_or_default();

        let Some(handler) = self.routes.get(&authority).cloned() else {
            return Err(TransportError::Unprocessed(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("no server at {authority}"),
            ))));
        };

        let mut http_request = http::Request::new(request.body().clone());
        *http_request.method_mut() = request.method().clone();
        *http_request.uri_mut() = request.uri().clone();
        *http_request.headers_mut() = request.headers().clone();

        let delay = self.response_delay;
        let exchange = async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            handler.handle(http_request).await
        };

        let response = match request.timeouts() {
            Some(timeouts) => tokio::time::timeout(timeouts.transfer, exchange)
                .await
                .map_err(|_| TransportError::TimedOut(timeouts.transfer))?,
            None => exchange.await,
        };

        Ok(response.map(full_response_body))
    }
}

/// Resolves from a fixed table and counts lookups.
#[derive(Default)]
pub struct StaticDnsResolver {
    records: HashMap<String, IpAddr>,
    lookups: AtomicUsize,
}

impl StaticDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.records.insert(name.to_string(), IpAddr::V4(ip));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DnsResolver for StaticDnsResolver {
    async fn resolve(
        &self,
        name: &str,
        _type_restriction: Option<DnsRecordType>,
    ) -> Result<Vec<IpAddr>, DnsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(name).copied().into_iter().collect())
    }

    async fn query(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<IpAddr>, DnsError> {
        self.resolve(name, Some(record_type)).await
    }
}

pub struct Harness {
    pub client: Arc<RpcClient>,
    pub transport: Arc<InMemoryTransport>,
    pub dns: Arc<StaticDnsResolver>,
}

pub fn default_dns() -> StaticDnsResolver {
    StaticDnsResolver::new().with_record(ENTRY_HOST, Ipv4Addr::new(10, 0, 0, 1))
}

pub fn fast_config() -> RpcClientConfig {
    RpcClientConfig::new().with_retrying_delay(Duration::from_millis(1))
}

pub fn harness(transport: InMemoryTransport, config: RpcClientConfig) -> Harness {
    let transport = Arc::new(transport);
    let dns = Arc::new(default_dns());
    let uri: Uri = format!("http://{ENTRY_HOST}:8181").parse().unwrap();

    let client = RpcClient::new(uri, transport.clone(), dns.clone()).with_config(config);

    Harness {
        client: Arc::new(client),
        transport,
        dns,
    }
}
