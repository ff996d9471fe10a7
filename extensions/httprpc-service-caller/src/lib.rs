mod body;
pub use body::*;

mod config;
pub use config::*;

pub mod constants;

mod dns;
pub use dns::*;

pub mod error;
pub use error::{DnsError, RequestBuildError, TransportError};

mod exception_from_response;
pub use exception_from_response::*;

mod proxy;
pub use proxy::*;

mod response_handler;
pub use response_handler::*;

mod rpc_client;
pub use rpc_client::*;

mod transport;
pub use transport::*;
