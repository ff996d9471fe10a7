use crate::{RpcServer, RpcServerError};
use httprpc_service_endpoint::RpcRequestHandler;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds an [`RpcServer`] listening on every IPv4 and IPv6 interface.
#[derive(Debug, Clone)]
pub struct RpcServerFactory {
    port: u16,
    request_handler: Arc<RpcRequestHandler>,
}

impl RpcServerFactory {
    pub fn new(port: u16, request_handler: Arc<RpcRequestHandler>) -> Self {
        Self {
            port,
            request_handler,
        }
    }

    /// Binds `[::]:port` and `0.0.0.0:port`.
    ///
    /// Where the IPv6 socket is dual-stack it already covers IPv4, and the
    /// second bind is skipped. A host without IPv6 is served on IPv4 only.
    pub async fn get_rpc_server(&self) -> Result<RpcServer, RpcServerError> {
        let v6_addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, self.port));
        let v4_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port));

        let mut listeners = Vec::with_capacity(2);

        match TcpListener::bind(v6_addr).await {
            Ok(listener) => listeners.push(listener),
            Err(err) => {
                tracing::warn!(addr = %v6_addr, error = %err, "ipv6 listener unavailable");
            }
        }

        match TcpListener::bind(v4_addr).await {
            Ok(listener) => listeners.push(listener),
            Err(err) if err.kind() == ErrorKind::AddrInUse && !listeners.is_empty() => {
                tracing::debug!(addr = %v4_addr, "ipv4 served by the dual-stack listener");
            }
            Err(source) => {
                return Err(RpcServerError::Bind {
                    addr: v4_addr,
                    source,
                });
            }
        }

        RpcServer::new(listeners, self.request_handler.clone())
    }
}
