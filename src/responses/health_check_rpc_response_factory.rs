use super::{ResponseBuilder, ResponseFactory, RpcHttpResponse};
use crate::message::RpcResponseType;

/// An empty Success response.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheckRpcResponseFactory;

impl ResponseFactory for HealthCheckRpcResponseFactory {
    fn get_response(&self) -> RpcHttpResponse {
        ResponseBuilder::new(RpcResponseType::Success).build()
    }
}
