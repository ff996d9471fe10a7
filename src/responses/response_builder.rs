use crate::message::{RpcHeaderMapExt, RpcMessageHeader, RpcResponseType};
use crate::constants::RPC_HEADER_TRUE;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Response, StatusCode, header::CONTENT_LENGTH};

/// A fully buffered protocol response.
pub type RpcHttpResponse = Response<Bytes>;

/// Assembles a protocol response around a single [`RpcResponseType`] tag.
///
/// Headers are first-wins: once a protocol header has been set, later
/// attempts to set it again are ignored. This includes the response-type
/// header added by [`ResponseBuilder::build`].
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    response_type: RpcResponseType,
    status: StatusCode,
    content: Bytes,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn new(response_type: RpcResponseType) -> Self {
        Self {
            response_type,
            status: StatusCode::OK,
            content: Bytes::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, header: RpcMessageHeader, value: &str) -> Self {
        if !self.headers.contains_rpc(header) {
            self.headers.set_rpc(header, value);
        }
        self
    }

    /// Flags the body as a serialized result.
    pub fn with_serialized_content(self) -> Self {
        self.with_header(RpcMessageHeader::WithSerializedContent, RPC_HEADER_TRUE)
    }

    pub fn build(self) -> RpcHttpResponse {
        let ResponseBuilder {
            response_type,
            status,
            content,
            headers,
        } = self;

        let mut headers = headers;
        if !headers.contains_rpc(RpcMessageHeader::ResponseType) {
            headers.set_rpc(RpcMessageHeader::ResponseType, response_type.as_str());
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(content.len()));

        let mut response = Response::new(content);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
