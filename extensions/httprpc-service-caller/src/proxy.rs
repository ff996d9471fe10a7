use crate::RpcClient;
use httprpc::RpcError;
use httprpc_service::RemoteInterface;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The interface-bound part of a proxy, shared by every proxy created for
/// the same interface.
#[derive(Debug)]
struct ProxyStub {
    interface: RemoteInterface,
}

/// Produces local stand-ins for remote interfaces.
///
/// Stubs are built on first use and cached by interface name for the life of
/// the factory.
#[derive(Debug, Default)]
pub struct RpcProxyFactory {
    stubs: Mutex<HashMap<String, Arc<ProxyStub>>>,
}

impl RpcProxyFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_proxy(&self, client: Arc<RpcClient>, interface: RemoteInterface) -> RpcProxy {
        let stub = self
            .stubs
            .lock()
            .entry(interface.name().to_string())
            .or_insert_with(|| {
                tracing::debug!(interface = interface.name(), "creating rpc proxy stub");
                Arc::new(ProxyStub { interface })
            })
            .clone();

        RpcProxy { client, stub }
    }

    pub fn cached_stub_count(&self) -> usize {
        self.stubs.lock().len()
    }
}

/// A callable stand-in bound to one remote interface.
#[derive(Debug, Clone)]
pub struct RpcProxy {
    client: Arc<RpcClient>,
    stub: Arc<ProxyStub>,
}

impl RpcProxy {
    pub fn interface_name(&self) -> &'static str {
        self.stub.interface.name()
    }

    pub fn available_methods(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stub.interface.methods().iter().map(|method| method.name())
    }

    /// Invokes `method_name` with already converted positional parameters.
    ///
    /// Methods not declared on the interface fail without any network I/O.
    pub async fn invoke(&self, method_name: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let interface_name = self.interface_name();

        if !self.stub.interface.has_method(method_name) {
            return Err(RpcError::rpc(format!(
                "Method {method_name} is not available for {interface_name}."
            )));
        }

        self.client.invoke(interface_name, method_name, params).await
    }

    /// Typed variant of [`RpcProxy::invoke`].
    ///
    /// `args` must serialize to a sequence (a tuple, array or `Vec`), or to
    /// unit for methods without parameters.
    pub async fn call<A, R>(&self, method_name: &str, args: A) -> Result<R, RpcError>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let interface_name = self.interface_name();

        let params = match serde_json::to_value(args) {
            Ok(Value::Array(params)) => params,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). \
                     Arguments must form a positional list, got {other}."
                )));
            }
            Err(err) => {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). \
                     Failed to serialize arguments: {err}."
                ))
                .with_source(err));
            }
        };

        let value = self.invoke(method_name, params).await?;

        serde_json::from_value(value).map_err(|err| {
            RpcError::possibly_processed(format!(
                "Failed to convert RPC result of {interface_name}::{method_name}(): {err}."
            ))
            .with_source(err)
        })
    }
}
