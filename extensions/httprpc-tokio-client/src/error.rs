use httprpc::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("failed to load the system dns configuration: {0}")]
    DnsConfig(#[source] BoxError),

    #[error("rpc server uri `{uri}` is invalid: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::uri::InvalidUri,
    },
}
