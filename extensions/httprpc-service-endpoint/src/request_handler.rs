use crate::{Intercept, InterceptorId, RequestInterceptor, RpcRequest};
use http::Method;
use httprpc::message::{RpcHeaderMapExt, RpcMessageHeader, RpcThrowableType};
use httprpc::responses::{
    HealthCheckRpcResponseFactory, ResponseFactory, RpcHttpResponse, SuccessRpcResponseFactory,
    ThrowableRpcResponseFactory,
};
use httprpc::{RpcError, RpcErrorKind, Throwable};
use httprpc_service::{Invocation, Reply, RpcRegistry, RpcSerializer, json_type_name};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The server dispatch engine.
///
/// [`RpcRequestHandler::handle`] never fails: every problem is answered with
/// a Throwable response whose throwable type tells the caller whether the
/// call may have had side effects.
pub struct RpcRequestHandler {
    serializer: Arc<dyn RpcSerializer>,
    registry: Arc<RpcRegistry>,
    health_check_route: Option<String>,
    interceptors: RwLock<BTreeMap<InterceptorId, RequestInterceptor>>,
    next_interceptor_id: AtomicU64,
}

impl RpcRequestHandler {
    pub fn new(serializer: Arc<dyn RpcSerializer>, registry: Arc<RpcRegistry>) -> Self {
        Self {
            serializer,
            registry,
            health_check_route: None,
            interceptors: RwLock::new(BTreeMap::new()),
            next_interceptor_id: AtomicU64::new(1),
        }
    }

    /// Answers requests for `/{route}` with an empty Success response.
    pub fn with_health_check_route(mut self, route: impl Into<String>) -> Self {
        let route = route.into();
        self.health_check_route = Some(format!("/{}", route.trim_start_matches('/')));
        self
    }

    pub fn registry(&self) -> &Arc<RpcRegistry> {
        &self.registry
    }

    /// Appends an interceptor to the chain. Interceptors run in registration order.
    pub fn register_interceptor(&self, interceptor: RequestInterceptor) -> InterceptorId {
        let id = InterceptorId::new(self.next_interceptor_id.fetch_add(1, Ordering::Relaxed));
        self.interceptors.write().insert(id, interceptor);
        tracing::debug!(%id, "registered request interceptor");
        id
    }

    /// Removes an interceptor. Requests already in the pipeline still run it.
    pub fn unregister_interceptor(&self, id: InterceptorId) -> bool {
        let removed = self.interceptors.write().remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "unregistered request interceptor");
        }
        removed
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.read().len()
    }

    pub async fn handle(&self, request: RpcRequest) -> RpcHttpResponse {
        if self.is_health_check(&request) {
            return HealthCheckRpcResponseFactory.get_response();
        }

        if request.method() != Method::POST {
            let err = RpcError::rpc("HTTP Request METHOD MUST be POST.").with_code(405);
            return throwable_response(&err, RpcThrowableType::Unprocessed);
        }

        let request = match self.run_interceptors(request).await {
            Intercept::Continue(request) => request,
            Intercept::Respond(response) => return response,
        };

        let invocation = match self.resolve_invocation(&request) {
            Ok(invocation) => invocation,
            Err(err) => {
                tracing::warn!(error = %err, "rejected rpc request");
                return throwable_response(&err, RpcThrowableType::Unprocessed);
            }
        };

        let reply = match invocation {
            Invocation::Deferred(reply) => reply,
            immediate @ Invocation::Immediate(_) => {
                let err = RpcError::rpc(format!(
                    "RPC calls must always return an instance of Deferred, got {}.",
                    immediate.kind_name()
                ));
                return throwable_response(&err, RpcThrowableType::Unprocessed);
            }
        };

        match reply.await {
            Ok(Reply::Value(value)) => self.make_success_response(&value),
            Ok(Reply::Response(response)) => response,
            Err(err) => {
                tracing::debug!(
                    class = err.class_name(),
                    message = err.message(),
                    "remote method failed"
                );
                throwable_response(&err, RpcThrowableType::PossiblyProcessed)
            }
        }
    }

    fn is_health_check(&self, request: &RpcRequest) -> bool {
        self.health_check_route
            .as_deref()
            .is_some_and(|route| request.uri().path() == route)
    }

    async fn run_interceptors(&self, mut request: RpcRequest) -> Intercept {
        // Snapshot, so interceptors may (un)register while the chain runs.
        let interceptors: Vec<(InterceptorId, RequestInterceptor)> = self
            .interceptors
            .read()
            .iter()
            .map(|(id, interceptor)| (*id, Arc::clone(interceptor)))
            .collect();

        for (id, interceptor) in interceptors {
            match interceptor(request, id).await {
                Ok(Intercept::Continue(next)) => request = next,
                Ok(Intercept::Respond(response)) => return Intercept::Respond(response),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "request interceptor failed");
                    let throwable_type = match err.kind() {
                        RpcErrorKind::Unprocessed => RpcThrowableType::Unprocessed,
                        _ => RpcThrowableType::PossiblyProcessed,
                    };
                    return Intercept::Respond(throwable_response(&err, throwable_type));
                }
            }
        }

        Intercept::Continue(request)
    }

    fn resolve_invocation(&self, request: &RpcRequest) -> Result<Invocation, RpcError> {
        let params = self
            .serializer
            .deserialize(request.body())
            .map_err(|err| RpcError::rpc("Failed to decode RPC parameters.").with_source(err))?;

        let headers = request.headers();
        let interface_name = headers
            .get_rpc(RpcMessageHeader::RpcRemoteInterfaceClassName)
            .filter(|name| !name.is_empty());
        let method_name = headers
            .get_rpc(RpcMessageHeader::RpcRemoteMethodName)
            .filter(|name| !name.is_empty());

        let (Some(interface_name), Some(method_name)) = (interface_name, method_name) else {
            return Err(RpcError::rpc(format!(
                "{}::{}() not found.",
                interface_name.unwrap_or("?interface"),
                method_name.unwrap_or("?method")
            )));
        };

        let params = match params {
            Value::Array(params) => params,
            other => {
                return Err(RpcError::rpc(format!(
                    "Invalid parameter format ({}). Array expected.",
                    json_type_name(&other)
                )));
            }
        };

        let Some(registration) = self.registry.get_remote_object(interface_name) else {
            return Err(RpcError::rpc(format!(
                "Failed to call {interface_name}::{method_name}(), because {interface_name} is not registered."
            )));
        };

        if !registration.interface().has_method(method_name) {
            return Err(RpcError::rpc(format!("{interface_name}::{method_name}() not found.")));
        }

        let class_name = registration.class_name();
        let remote_object = registration.instantiate().map_err(|err| {
            RpcError::rpc(format!(
                "Failed to call {class_name}::{method_name}(), because {class_name} is not exists."
            ))
            .with_boxed_source(err, "InstantiationError")
        })?;

        tracing::debug!(
            interface = interface_name,
            method = method_name,
            class = class_name,
            "dispatching rpc request"
        );

        remote_object.dispatch(method_name, params).ok_or_else(|| {
            RpcError::rpc(format!(
                "Failed to call {class_name}::{method_name}(), because {method_name} is not exists in {class_name}."
            ))
        })
    }

    fn make_success_response(&self, value: &Value) -> RpcHttpResponse {
        match self.serializer.serialize(value) {
            Ok(content) => SuccessRpcResponseFactory::new(content).get_response(),
            Err(err) => {
                let err = RpcError::rpc(format!(
                    "Failed to serialize RPC return value, due an error: {err}."
                ))
                .with_source(err);
                throwable_response(&err, RpcThrowableType::Processed)
            }
        }
    }
}

impl std::fmt::Debug for RpcRequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcRequestHandler")
            .field("registry", &self.registry)
            .field("health_check_route", &self.health_check_route)
            .field("interceptors", &self.interceptor_count())
            .finish_non_exhaustive()
    }
}

fn throwable_response<T>(throwable: &T, throwable_type: RpcThrowableType) -> RpcHttpResponse
where
    T: Throwable + ?Sized,
{
    ThrowableRpcResponseFactory::new(throwable, throwable_type).get_response()
}
