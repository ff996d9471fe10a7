use crate::ClientBuildError;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use std::time::Duration;

pub const DEFAULT_DNS_RESOLVER_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_DNS_RESOLVER_ATTEMPTS: usize = 2;
pub const DEFAULT_DNS_RESOLVER_CACHE_SIZE: usize = 5000;

/// Resolver tuning applied on top of the system configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsConfig {
    pub timeout: Duration,
    pub attempts: usize,
    pub cache_size: usize,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DNS_RESOLVER_TIMEOUT,
            attempts: DEFAULT_DNS_RESOLVER_ATTEMPTS,
            cache_size: DEFAULT_DNS_RESOLVER_CACHE_SIZE,
        }
    }
}

/// Loads the system resolver configuration (name servers, search list,
/// ndots) and overrides timeout, attempts and cache size.
#[derive(Debug, Clone, Default)]
pub struct DnsConfigLoader {
    config: DnsConfig,
}

impl DnsConfigLoader {
    pub fn new(config: DnsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> DnsConfig {
        self.config
    }

    pub fn load(&self) -> Result<(ResolverConfig, ResolverOpts), ClientBuildError> {
        let (resolver_config, options) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|err| ClientBuildError::DnsConfig(Box::new(err)))?;

        Ok((resolver_config, self.apply(options)))
    }

    /// Applies the overrides to `options`, keeping everything else.
    pub fn apply(&self, mut options: ResolverOpts) -> ResolverOpts {
        options.timeout = self.config.timeout;
        options.attempts = self.config.attempts;
        options.cache_size = self.config.cache_size as _;
        options
    }
}
