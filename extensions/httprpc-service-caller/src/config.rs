use crate::constants::{
    DEFAULT_REDIRECTS_LIMIT, DEFAULT_RETRYING_DELAY_IN_MS, DEFAULT_RETRYING_LIMIT,
};
use std::time::Duration;

/// Immutable client configuration.
///
/// A limit of zero disables retries or redirects entirely: the first retry
/// or redirect signal then fails the call as unprocessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcClientConfig {
    redirects_limit: u32,
    retrying_limit: u32,
    retrying_delay: Duration,
    request_timeout: Option<Duration>,
    target_entity_id_param_position: Option<usize>,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            redirects_limit: DEFAULT_REDIRECTS_LIMIT,
            retrying_limit: DEFAULT_RETRYING_LIMIT,
            retrying_delay: Duration::from_millis(DEFAULT_RETRYING_DELAY_IN_MS),
            request_timeout: None,
            target_entity_id_param_position: None,
        }
    }
}

impl RpcClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redirects_limit(mut self, redirects_limit: u32) -> Self {
        self.redirects_limit = redirects_limit;
        self
    }

    pub fn with_retrying_limit(mut self, retrying_limit: u32) -> Self {
        self.retrying_limit = retrying_limit;
        self
    }

    pub fn with_retrying_delay(mut self, retrying_delay: Duration) -> Self {
        self.retrying_delay = retrying_delay;
        self
    }

    /// A zero timeout is the same as none.
    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout.filter(|timeout| !timeout.is_zero());
        self
    }

    /// Position of the call parameter that identifies the target entity.
    pub fn with_target_entity_id_param_position(mut self, position: Option<usize>) -> Self {
        self.target_entity_id_param_position = position;
        self
    }

    pub fn redirects_limit(&self) -> u32 {
        self.redirects_limit
    }

    pub fn retrying_limit(&self) -> u32 {
        self.retrying_limit
    }

    pub fn retrying_delay(&self) -> Duration {
        self.retrying_delay
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn target_entity_id_param_position(&self) -> Option<usize> {
        self.target_entity_id_param_position
    }
}
