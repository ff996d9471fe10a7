use crate::DnsError;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DnsRecordType {
    A,
    Aaaa,
}

/// Resolves host names for request building.
#[async_trait::async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolves `name`, optionally restricted to one record type. Without a
    /// restriction, implementations return A and AAAA records.
    async fn resolve(
        &self,
        name: &str,
        type_restriction: Option<DnsRecordType>,
    ) -> Result<Vec<IpAddr>, DnsError>;

    /// Queries a single record type without any fallback.
    async fn query(&self, name: &str, record_type: DnsRecordType) -> Result<Vec<IpAddr>, DnsError>;

    async fn get_first_a_record(&self, name: &str) -> Result<Ipv4Addr, DnsError> {
        self.resolve(name, Some(DnsRecordType::A))
            .await?
            .into_iter()
            .find_map(|ip| match ip {
                IpAddr::V4(ip) => Some(ip),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| DnsError::NoRecord(name.to_string()))
    }
}
