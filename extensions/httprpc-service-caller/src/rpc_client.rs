use crate::{
    DnsResolver, RequestBuildError, RpcClientConfig, RpcResponseHandler,
    RpcResponseHandlerInterface, RpcTransport, TransportError,
};
use futures::future::BoxFuture;
use http::Uri;
use httprpc::RpcError;
use httprpc::cache::{RequestToUriCache, build_request_to_uri_cache_key};
use httprpc::call::{OutboundRequest, RequestTimeouts, RpcCall};
use httprpc::message::RpcMessageHeader;
use httprpc::utils::{is_ip_literal, uri_to_target_string, uri_with_host};
use httprpc_service::{JsonSerializer, RpcSerializer};
use serde_json::Value;
use std::sync::Arc;

/// The client dispatch engine.
///
/// Every call is driven through a mutable [`RpcCall`]. Retries and redirects
/// re-enter [`RpcClient::call`] with that same descriptor, so its counters
/// and its already built request carry over from one attempt to the next.
pub struct RpcClient {
    uri: Uri,
    config: RpcClientConfig,
    response_handler: Arc<dyn RpcResponseHandlerInterface>,
    serializer: Arc<dyn RpcSerializer>,
    transport: Arc<dyn RpcTransport>,
    dns_resolver: Arc<dyn DnsResolver>,
    request_to_uri_cache: Arc<RequestToUriCache>,
}

impl RpcClient {
    /// Creates a client for the entry server at `uri`, with the default
    /// configuration, JSON serializer, response handler and cache.
    pub fn new(
        uri: Uri,
        transport: Arc<dyn RpcTransport>,
        dns_resolver: Arc<dyn DnsResolver>,
    ) -> Self {
        Self {
            uri,
            config: RpcClientConfig::default(),
            response_handler: Arc::new(RpcResponseHandler),
            serializer: Arc::new(JsonSerializer),
            transport,
            dns_resolver,
            request_to_uri_cache: Arc::new(RequestToUriCache::default()),
        }
    }

    pub fn with_config(mut self, config: RpcClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_response_handler(
        mut self,
        response_handler: Arc<dyn RpcResponseHandlerInterface>,
    ) -> Self {
        self.response_handler = response_handler;
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn RpcSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_request_to_uri_cache(mut self, cache: Arc<RequestToUriCache>) -> Self {
        self.request_to_uri_cache = cache;
        self
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    pub fn serializer(&self) -> &dyn RpcSerializer {
        self.serializer.as_ref()
    }

    pub fn request_to_uri_cache(&self) -> &RequestToUriCache {
        &self.request_to_uri_cache
    }

    pub fn get_item_from_request_to_uri_cache(&self, key: &str) -> Option<String> {
        self.request_to_uri_cache.get(key).filter(|target| !target.is_empty())
    }

    pub fn put_item_to_request_to_uri_cache(&self, key: Option<&str>, target: impl Into<String>) {
        if let Some(key) = key {
            self.request_to_uri_cache.put(key, target);
        }
    }

    pub fn remove_item_from_request_to_uri_cache(&self, key: Option<&str>) {
        let Some(key) = key else {
            return;
        };

        if self.request_to_uri_cache.remove(key).is_some() {
            tracing::warn!(cache_key = key, "evicted request-to-uri cache entry");
        }
    }

    /// Convenience wrapper creating a fresh descriptor for one call.
    pub async fn invoke(
        &self,
        interface_name: &str,
        method_name: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError> {
        let mut rpc_call = RpcCall::new(interface_name, method_name, params);
        self.call(&mut rpc_call).await
    }

    /// Dispatches `rpc_call` and resolves to the deserialized result.
    ///
    /// Every failure is classified into an [`RpcError`], and every failure
    /// evicts the call's cache entry before it is returned.
    pub fn call<'a>(&'a self, rpc_call: &'a mut RpcCall) -> BoxFuture<'a, Result<Value, RpcError>> {
        Box::pin(async move {
            if rpc_call.request.is_none() {
                let request = self.build_request(rpc_call).await.map_err(|err| {
                    let rpc_error = RpcError::unprocessed(format!(
                        "Failed RPC call for {}::{}() due to request building fail. Error message: {}.",
                        rpc_call.interface_name(),
                        rpc_call.method_name(),
                        err
                    ));
                    tracing::warn!(
                        interface = rpc_call.interface_name(),
                        method = rpc_call.method_name(),
                        error = %err,
                        "failed to build rpc request"
                    );
                    rpc_error.with_source(err)
                })?;
                rpc_call.request = Some(request);
            }

            let Some(request) = rpc_call.request.as_ref() else {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {}::{}(). RpcCall object does not contain Request object",
                    rpc_call.interface_name(),
                    rpc_call.method_name()
                )));
            };

            let cache_key = request.cache_key().map(str::to_owned);

            tracing::debug!(
                interface = rpc_call.interface_name(),
                method = rpc_call.method_name(),
                uri = %request.uri(),
                retrying_count = rpc_call.retrying_count,
                redirection_count = rpc_call.redirection_count,
                "dispatching rpc call"
            );

            let sent = self.transport.send(request).await;

            let result = match sent {
                Ok(response) => {
                    self.response_handler
                        .handle_response(response, rpc_call, self)
                        .await
                }
                Err(TransportError::Unprocessed(source)) => {
                    self.remove_item_from_request_to_uri_cache(cache_key.as_deref());

                    if rpc_call.bump_retrying_count() < self.config.retrying_limit() {
                        tracing::debug!(
                            interface = rpc_call.interface_name(),
                            method = rpc_call.method_name(),
                            attempt = rpc_call.retrying_count,
                            "request was not processed, retrying"
                        );
                        tokio::time::sleep(self.config.retrying_delay()).await;
                        return self.call(rpc_call).await;
                    }

                    Err(RpcError::unprocessed(format!(
                        "Failed RPC call due to an HTTP communication failure for {}::{}(). \
                         The request was not processed. Error message: {}.",
                        rpc_call.interface_name(),
                        rpc_call.method_name(),
                        source
                    ))
                    .with_boxed_source(source, "UnprocessedRequest"))
                }
                Err(err) => Err(RpcError::possibly_processed(format!(
                    "Failed RPC call due to an HTTP communication failure for {}::{}(). Error message: {}.",
                    rpc_call.interface_name(),
                    rpc_call.method_name(),
                    err
                ))
                .with_source(err)),
            };

            match result {
                Ok(value) => {
                    if let Some(key) = cache_key.as_deref() {
                        self.remember_resolved_target(key, rpc_call);
                    }
                    Ok(value)
                }
                Err(err) => {
                    self.remove_item_from_request_to_uri_cache(cache_key.as_deref());
                    tracing::warn!(
                        interface = rpc_call.interface_name(),
                        method = rpc_call.method_name(),
                        kind = ?err.kind(),
                        "rpc call failed: {}",
                        err
                    );
                    Err(err)
                }
            }
        })
    }

    /// Records where a successful call landed, so later calls under the same
    /// key skip resolution. An entry left by a redirect is kept.
    fn remember_resolved_target(&self, key: &str, rpc_call: &RpcCall) {
        if self.request_to_uri_cache.contains(key) {
            return;
        }

        if let Some(request) = rpc_call.request.as_ref() {
            self.request_to_uri_cache
                .put(key, uri_to_target_string(request.uri()));
        }
    }

    async fn build_request(&self, rpc_call: &RpcCall) -> Result<OutboundRequest, RequestBuildError> {
        let params = Value::Array(rpc_call.params().to_vec());
        let body = self.serializer.serialize(&params).map_err(|source| {
            RequestBuildError::Serialization {
                interface: rpc_call.interface_name().to_string(),
                method: rpc_call.method_name().to_string(),
                source,
            }
        })?;

        let mut request = OutboundRequest::post(self.uri.clone(), body);

        let target_entity_id = self
            .config
            .target_entity_id_param_position()
            .and_then(|position| rpc_call.params().get(position))
            .and_then(stringify_entity_id);

        if let Some(target_entity_id) = target_entity_id.as_deref() {
            request.set_rpc_header(RpcMessageHeader::TargetEntity, target_entity_id);
        }

        if let Some(host) = self.uri.host().filter(|host| !is_ip_literal(host)) {
            let cache_key = build_request_to_uri_cache_key(
                host,
                rpc_call.interface_name(),
                rpc_call.method_name(),
                target_entity_id.as_deref(),
            );
            request.set_cache_key(cache_key.clone());

            match self.get_item_from_request_to_uri_cache(&cache_key) {
                Some(target) => {
                    let uri = target
                        .parse::<Uri>()
                        .map_err(|source| RequestBuildError::CachedTarget {
                            target: target.clone(),
                            source,
                        })?;
                    request.set_uri(uri);
                }
                None => {
                    let server_ip = self.dns_resolver.get_first_a_record(host).await?;
                    request.set_uri(uri_with_host(request.uri(), &server_ip.to_string())?);
                }
            }
        }

        if let Some(timeout) = self.config.request_timeout() {
            request.set_timeouts(RequestTimeouts::from_request_timeout(timeout));
        }

        request.set_rpc_header(
            RpcMessageHeader::RpcRemoteInterfaceClassName,
            rpc_call.interface_name(),
        );
        request.set_rpc_header(RpcMessageHeader::RpcRemoteMethodName, rpc_call.method_name());

        Ok(request)
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("uri", &self.uri)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Strings are forwarded as is, other scalars in their JSON spelling.
/// A null parameter carries no entity id.
fn stringify_entity_id(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}
