use crate::call::OutboundRequest;
use serde_json::Value;

/// One logical remote call in flight.
///
/// The descriptor is exclusively owned by the call chain that created it.
/// Retries and redirects reuse it, so both counters and the lazily built
/// request persist across attempts.
#[derive(Debug, Clone)]
pub struct RpcCall {
    interface_name: String,
    method_name: String,
    params: Vec<Value>,
    pub request: Option<OutboundRequest>,
    pub retrying_count: u32,
    pub redirection_count: u32,
}

impl RpcCall {
    pub fn new(
        interface_name: impl Into<String>,
        method_name: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self {
            interface_name: interface_name.into(),
            method_name: method_name.into(),
            params,
            request: None,
            retrying_count: 0,
            redirection_count: 0,
        }
    }

    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Counts one retry and returns the count from before this one.
    pub fn bump_retrying_count(&mut self) -> u32 {
        let previous = self.retrying_count;
        self.retrying_count = self.retrying_count.saturating_add(1);
        previous
    }

    /// Counts one redirect and returns the count from before this one.
    pub fn bump_redirection_count(&mut self) -> u32 {
        let previous = self.redirection_count;
        self.redirection_count = self.redirection_count.saturating_add(1);
        previous
    }

    /// The cache key recorded on the built request.
    pub fn cache_key(&self) -> Option<&str> {
        self.request.as_ref().and_then(OutboundRequest::cache_key)
    }
}
