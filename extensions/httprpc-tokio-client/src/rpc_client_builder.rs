use crate::{ClientBuildError, DnsConfig, DnsConfigLoader, HickoryDnsResolver, HyperTransport};
use http::Uri;
use httprpc::cache::RequestToUriCache;
use httprpc::constants::DEFAULT_REQUEST_TO_URI_CACHE_CAPACITY;
use httprpc_service::RpcSerializer;
use httprpc_service_caller::{
    DnsResolver, RpcClient, RpcClientConfig, RpcResponseHandlerInterface, RpcTransport,
};
use std::sync::Arc;

pub const DEFAULT_URI_SCHEME: &str = "http";
pub const DEFAULT_RPC_SERVER_PORT: u16 = 8080;

/// Assembles an [`RpcClient`] with the hyper transport and hickory DNS
/// resolver unless other collaborators are supplied.
pub struct RpcClientBuilder {
    host: String,
    scheme: String,
    port: u16,
    config: RpcClientConfig,
    dns_config: DnsConfig,
    request_to_uri_cache: Option<Arc<RequestToUriCache>>,
    serializer: Option<Arc<dyn RpcSerializer>>,
    response_handler: Option<Arc<dyn RpcResponseHandlerInterface>>,
    transport: Option<Arc<dyn RpcTransport>>,
    dns_resolver: Option<Arc<dyn DnsResolver>>,
}

impl RpcClientBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: DEFAULT_URI_SCHEME.to_string(),
            port: DEFAULT_RPC_SERVER_PORT,
            config: RpcClientConfig::default(),
            dns_config: DnsConfig::default(),
            request_to_uri_cache: None,
            serializer: None,
            response_handler: None,
            transport: None,
            dns_resolver: None,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_config(mut self, config: RpcClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_dns_config(mut self, dns_config: DnsConfig) -> Self {
        self.dns_config = dns_config;
        self
    }

    pub fn with_request_to_uri_cache(mut self, cache: Arc<RequestToUriCache>) -> Self {
        self.request_to_uri_cache = Some(cache);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn RpcSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn with_response_handler(
        mut self,
        response_handler: Arc<dyn RpcResponseHandlerInterface>,
    ) -> Self {
        self.response_handler = Some(response_handler);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_dns_resolver(mut self, dns_resolver: Arc<dyn DnsResolver>) -> Self {
        self.dns_resolver = Some(dns_resolver);
        self
    }

    /// The entry server uri, lower-cased.
    pub fn server_uri(&self) -> Result<Uri, ClientBuildError> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        let uri = format!("{}://{}:{}", self.scheme, host, self.port).to_lowercase();

        uri.parse::<Uri>()
            .map_err(|source| ClientBuildError::InvalidUri { uri, source })
    }

    pub fn build(self) -> Result<RpcClient, ClientBuildError> {
        let uri = self.server_uri()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let connect_timeout = self.config.request_timeout().map(|timeout| timeout / 2);
                Arc::new(HyperTransport::new(connect_timeout))
            }
        };

        let dns_resolver = match self.dns_resolver {
            Some(dns_resolver) => dns_resolver,
            None => Arc::new(HickoryDnsResolver::from_loader(&DnsConfigLoader::new(
                self.dns_config,
            ))?),
        };

        let request_to_uri_cache = self.request_to_uri_cache.unwrap_or_else(|| {
            Arc::new(RequestToUriCache::new(DEFAULT_REQUEST_TO_URI_CACHE_CAPACITY))
        });

        tracing::debug!(%uri, "building rpc client");

        let mut client = RpcClient::new(uri, transport, dns_resolver)
            .with_config(self.config)
            .with_request_to_uri_cache(request_to_uri_cache);

        if let Some(serializer) = self.serializer {
            client = client.with_serializer(serializer);
        }

        if let Some(response_handler) = self.response_handler {
            client = client.with_response_handler(response_handler);
        }

        Ok(client)
    }
}

impl std::fmt::Debug for RpcClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClientBuilder")
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .field("port", &self.port)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
