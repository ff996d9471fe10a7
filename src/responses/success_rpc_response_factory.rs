use super::{ResponseBuilder, ResponseFactory, RpcHttpResponse};
use crate::message::RpcResponseType;
use bytes::Bytes;

/// Wraps an already serialized call result.
#[derive(Debug, Clone)]
pub struct SuccessRpcResponseFactory {
    serialized_result: Bytes,
}

impl SuccessRpcResponseFactory {
    pub fn new(serialized_result: impl Into<Bytes>) -> Self {
        Self {
            serialized_result: serialized_result.into(),
        }
    }
}

impl ResponseFactory for SuccessRpcResponseFactory {
    fn get_response(&self) -> RpcHttpResponse {
        ResponseBuilder::new(RpcResponseType::Success)
            .with_content(self.serialized_result.clone())
            .with_serialized_content()
            .build()
    }
}
