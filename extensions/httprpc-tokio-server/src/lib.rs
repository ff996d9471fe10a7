pub mod error;
pub use error::RpcServerError;

mod rpc_server;
pub use rpc_server::*;

mod rpc_server_factory;
pub use rpc_server_factory::*;

pub mod utils;
