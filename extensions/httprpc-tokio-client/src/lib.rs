mod dns_config;
pub use dns_config::*;

pub mod error;
pub use error::ClientBuildError;

mod hickory_dns_resolver;
pub use hickory_dns_resolver::*;

mod hyper_transport;
pub use hyper_transport::*;

mod rpc_client_builder;
pub use rpc_client_builder::*;
