use super::{ResponseBuilder, ResponseFactory, RpcHttpResponse};
use crate::message::{RpcMessageHeader, RpcResponseType};

/// Asks the caller to send the same call again, optionally after a
/// server-suggested delay in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryRpcResponseFactory {
    retry_with_delay_in_ms: Option<u64>,
}

impl RetryRpcResponseFactory {
    pub fn new(retry_with_delay_in_ms: Option<u64>) -> Self {
        Self {
            retry_with_delay_in_ms,
        }
    }
}

impl ResponseFactory for RetryRpcResponseFactory {
    fn get_response(&self) -> RpcHttpResponse {
        let mut builder = ResponseBuilder::new(RpcResponseType::Retry);

        // A zero delay is the same as no suggestion.
        if let Some(delay) = self.retry_with_delay_in_ms.filter(|delay| *delay > 0) {
            builder = builder.with_header(RpcMessageHeader::RetryWithDelay, &delay.to_string());
        }

        builder.build()
    }
}
