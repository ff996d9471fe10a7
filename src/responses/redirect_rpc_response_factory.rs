use super::{ResponseBuilder, ResponseFactory, RpcHttpResponse};
use crate::constants::RPC_HEADER_TRUE;
use crate::message::{RpcMessageHeader, RpcResponseType};

/// Sends the caller to another host, and optionally another path and port.
#[derive(Debug, Clone)]
pub struct RedirectRpcResponseFactory {
    redirect_to_host_or_ip: String,
    redirect_to_path: Option<String>,
    redirect_to_port: Option<u16>,
    direct_direction: bool,
}

impl RedirectRpcResponseFactory {
    pub fn new(redirect_to_host_or_ip: impl Into<String>) -> Self {
        Self {
            redirect_to_host_or_ip: redirect_to_host_or_ip.into(),
            redirect_to_path: None,
            redirect_to_port: None,
            direct_direction: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_to_path = Some(path.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.redirect_to_port = Some(port);
        self
    }

    /// Marks the redirect as issued by a specific relay, so the next hop
    /// should serve the call rather than redirect it again.
    pub fn with_direct_direction(mut self, direct_direction: bool) -> Self {
        self.direct_direction = direct_direction;
        self
    }
}

impl ResponseFactory for RedirectRpcResponseFactory {
    fn get_response(&self) -> RpcHttpResponse {
        let mut builder = ResponseBuilder::new(RpcResponseType::Redirect)
            .with_header(RpcMessageHeader::RedirectToHostOrIp, &self.redirect_to_host_or_ip);

        if let Some(path) = self.redirect_to_path.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.with_header(RpcMessageHeader::RedirectToPath, path);
        }

        if let Some(port) = self.redirect_to_port.filter(|p| *p > 0) {
            builder = builder.with_header(RpcMessageHeader::RedirectToPort, &port.to_string());
        }

        if self.direct_direction {
            builder = builder.with_header(RpcMessageHeader::DirectDirection, RPC_HEADER_TRUE);
        }

        builder.build()
    }
}
