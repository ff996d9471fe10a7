use crate::{ClientBuildError, DnsConfigLoader};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, Resolver, TokioResolver};
use httprpc_service_caller::{DnsError, DnsRecordType, DnsResolver};
use std::net::IpAddr;

/// [`DnsResolver`] backed by hickory. Answers are cached by the resolver
/// itself, bounded by its configured cache size.
pub struct HickoryDnsResolver {
    resolver: TokioResolver,
}

impl HickoryDnsResolver {
    pub fn new(config: ResolverConfig, options: ResolverOpts) -> Self {
        let resolver = Resolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(options)
            .build();

        Self { resolver }
    }

    pub fn from_loader(loader: &DnsConfigLoader) -> Result<Self, ClientBuildError> {
        let (config, options) = loader.load()?;
        Ok(Self::new(config, options))
    }
}

impl std::fmt::Debug for HickoryDnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryDnsResolver").finish_non_exhaustive()
    }
}

fn resolve_error(name: &str, err: ResolveError) -> Result<Vec<IpAddr>, DnsError> {
    if err.is_no_records_found() {
        return Ok(Vec::new());
    }

    Err(DnsError::Resolve {
        name: name.to_string(),
        source: Box::new(err),
    })
}

#[async_trait::async_trait]
impl DnsResolver for HickoryDnsResolver {
    async fn resolve(
        &self,
        name: &str,
        type_restriction: Option<DnsRecordType>,
    ) -> Result<Vec<IpAddr>, DnsError> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        match type_restriction {
            Some(record_type) => self.query(name, record_type).await,
            None => match self.resolver.lookup_ip(name).await {
                Ok(lookup) => Ok(lookup.iter().collect()),
                Err(err) => resolve_error(name, err),
            },
        }
    }

    async fn query(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<IpAddr>, DnsError> {
        tracing::trace!(name, ?record_type, "dns query");

        match record_type {
            DnsRecordType::A => match self.resolver.ipv4_lookup(name).await {
                Ok(lookup) => Ok(lookup.iter().map(|record| IpAddr::V4(record.0)).collect()),
                Err(err) => resolve_error(name, err),
            },
            DnsRecordType::Aaaa => match self.resolver.ipv6_lookup(name).await {
                Ok(lookup) => Ok(lookup.iter().map(|record| IpAddr::V6(record.0)).collect()),
                Err(err) => resolve_error(name, err),
            },
        }
    }
}
