use super::{ResponseBuilder, ResponseFactory, RpcHttpResponse};
use crate::error::Throwable;
use crate::message::{RpcMessageHeader, RpcResponseType, RpcThrowableType};

/// Reports a failure as a Throwable response: the class, code and type travel
/// in headers and the message is the body.
#[derive(Debug, Clone)]
pub struct ThrowableRpcResponseFactory {
    class_name: String,
    code: i64,
    message: String,
    throwable_type: RpcThrowableType,
}

impl ThrowableRpcResponseFactory {
    pub fn new<T>(throwable: &T, throwable_type: RpcThrowableType) -> Self
    where
        T: Throwable + ?Sized,
    {
        Self {
            class_name: throwable.class_name().to_string(),
            code: throwable.code(),
            message: throwable.message().to_string(),
            throwable_type,
        }
    }
}

impl ResponseFactory for ThrowableRpcResponseFactory {
    fn get_response(&self) -> RpcHttpResponse {
        ResponseBuilder::new(RpcResponseType::Throwable)
            .with_header(RpcMessageHeader::ThrowableType, self.throwable_type.as_str())
            .with_header(RpcMessageHeader::ThrowableCode, &self.code.to_string())
            .with_header(RpcMessageHeader::ThrowableClass, &self.class_name)
            .with_content(self.message.clone())
            .build()
    }
}
