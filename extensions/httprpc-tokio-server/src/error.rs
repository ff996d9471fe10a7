use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum RpcServerError {
    #[error("failed to bind rpc server listener on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("rpc server was already started")]
    AlreadyStarted,
    #[error("rpc server is not running")]
    NotRunning,
    #[error("rpc server listener failed")]
    Serve(#[from] std::io::Error),
    #[error("rpc server task failed")]
    Task(#[from] tokio::task::JoinError),
}
