mod health_check_rpc_response_factory;
mod redirect_rpc_response_factory;
mod response_builder;
mod retry_rpc_response_factory;
mod success_rpc_response_factory;
mod throwable_rpc_response_factory;

pub use health_check_rpc_response_factory::HealthCheckRpcResponseFactory;
pub use redirect_rpc_response_factory::RedirectRpcResponseFactory;
pub use response_builder::{ResponseBuilder, RpcHttpResponse};
pub use retry_rpc_response_factory::RetryRpcResponseFactory;
pub use success_rpc_response_factory::SuccessRpcResponseFactory;
pub use throwable_rpc_response_factory::ThrowableRpcResponseFactory;

/// Produces one complete protocol response.
pub trait ResponseFactory {
    fn get_response(&self) -> RpcHttpResponse;
}
