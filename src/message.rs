mod header_map_ext;
mod rpc_message_header;
mod rpc_response_type;
mod rpc_throwable_type;

pub use header_map_ext::*;
pub use rpc_message_header::*;
pub use rpc_response_type::*;
pub use rpc_throwable_type::*;
