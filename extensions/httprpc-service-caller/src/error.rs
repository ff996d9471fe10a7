use httprpc::BoxError;
use httprpc::utils::UriRewriteError;
use httprpc_service::SerializationError;
use std::time::Duration;

/// Failure reported by an [`RpcTransport`](crate::RpcTransport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request provably never reached the remote side, e.g. the
    /// connection could not be established.
    #[error("request was not processed: {0}")]
    Unprocessed(#[source] BoxError),

    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    /// Anything else. The remote side may have seen the request.
    #[error("transport failure: {0}")]
    Failed(#[source] BoxError),
}

#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("Failed to get ip from hostname '{0}'")]
    NoRecord(String),

    #[error("failed to resolve '{name}': {source}")]
    Resolve {
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Failure while building the outbound request of a call. Nothing has been
/// sent when this occurs.
#[derive(Debug, thiserror::Error)]
pub enum RequestBuildError {
    #[error("Failed to serialize RPC parameters for {interface}::{method}() due an error: {source}.")]
    Serialization {
        interface: String,
        method: String,
        #[source]
        source: SerializationError,
    },

    #[error(transparent)]
    Dns(#[from] DnsError),

    #[error(transparent)]
    Uri(#[from] UriRewriteError),

    #[error("cached target `{target}` is not a valid uri: {source}")]
    CachedTarget {
        target: String,
        #[source]
        source: http::uri::InvalidUri,
    },
}
