mod outbound_request;
mod rpc_call;

pub use outbound_request::{OutboundRequest, RequestTimeouts};
pub use rpc_call::RpcCall;
