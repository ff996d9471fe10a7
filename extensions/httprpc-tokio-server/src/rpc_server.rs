//! Note: This `RpcServer` does not include authentication or authorization
//! mechanisms. It is suited for trusted, internal network communication.

use crate::RpcServerError;
use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use httprpc::RpcError;
use httprpc::message::RpcThrowableType;
use httprpc::responses::{ResponseFactory, ThrowableRpcResponseFactory};
use httprpc_service_endpoint::{InterceptorId, RequestInterceptor, RpcRequestHandler};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Upper bound for a buffered request body.
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024 * 1024;

struct RunningServer {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<std::io::Result<()>>>,
}

/// Serves one [`RpcRequestHandler`] on one or more bound listeners.
///
/// Every path and method reaches the handler, which answers anything it
/// does not accept with a Throwable response.
pub struct RpcServer {
    request_handler: Arc<RpcRequestHandler>,
    local_addrs: Vec<SocketAddr>,
    pending_listeners: Mutex<Vec<TcpListener>>,
    running: Mutex<Option<RunningServer>>,
}

impl RpcServer {
    pub fn new(
        listeners: Vec<TcpListener>,
        request_handler: Arc<RpcRequestHandler>,
    ) -> Result<Self, RpcServerError> {
        let local_addrs = listeners
            .iter()
            .map(TcpListener::local_addr)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            request_handler,
            local_addrs,
            pending_listeners: Mutex::new(listeners),
            running: Mutex::new(None),
        })
    }

    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.local_addrs
    }

    pub fn request_handler(&self) -> Arc<RpcRequestHandler> {
        self.request_handler.clone()
    }

    pub fn register_request_interceptor(&self, interceptor: RequestInterceptor) -> InterceptorId {
        self.request_handler.register_interceptor(interceptor)
    }

    pub fn unregister_request_interceptor(&self, id: InterceptorId) -> bool {
        self.request_handler.unregister_interceptor(id)
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Starts serving every listener on its own task. A server is started at
    /// most once.
    pub fn start(&self) -> Result<(), RpcServerError> {
        let listeners = std::mem::take(&mut *self.pending_listeners.lock());
        if listeners.is_empty() {
            return Err(RpcServerError::AlreadyStarted);
        }

        let (shutdown, _) = watch::channel(false);
        let app = router(self.request_handler.clone());

        let tasks = listeners
            .into_iter()
            .map(|listener| {
                let app = app.clone();
                let mut shutdown_rx = shutdown.subscribe();
                tokio::spawn(async move {
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            let _ = shutdown_rx.wait_for(|stop| *stop).await;
                        })
                        .await
                })
            })
            .collect();

        *self.running.lock() = Some(RunningServer { shutdown, tasks });

        tracing::info!(addrs = ?self.local_addrs, "Rpc server started successfully");

        Ok(())
    }

    /// Stops accepting connections, lets in-flight requests finish, and waits
    /// for every listener task to end.
    pub async fn stop(&self) -> Result<(), RpcServerError> {
        let Some(running) = self.running.lock().take() else {
            return Err(RpcServerError::NotRunning);
        };

        let _ = running.shutdown.send(true);

        for task in running.tasks {
            task.await??;
        }

        tracing::info!(addrs = ?self.local_addrs, "Rpc server stopped successfully");

        Ok(())
    }
}

impl std::fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcServer")
            .field("local_addrs", &self.local_addrs)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn router(request_handler: Arc<RpcRequestHandler>) -> Router {
    Router::new().fallback(move |request: Request| {
        let request_handler = request_handler.clone();
        async move { handle_http_request(&request_handler, request).await }
    })
}

async fn handle_http_request(request_handler: &RpcRequestHandler, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let response = match axum::body::to_bytes(body, MAX_REQUEST_BODY_SIZE).await {
        Ok(body) => {
            request_handler
                .handle(http::Request::from_parts(parts, body))
                .await
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to read rpc request body");
            let err = RpcError::unprocessed(format!("Failed to read RPC request body: {err}."));
            ThrowableRpcResponseFactory::new(&err, RpcThrowableType::Unprocessed).get_response()
        }
    };

    response.map(Body::from)
}
