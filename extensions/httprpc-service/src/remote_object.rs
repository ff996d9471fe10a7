use crate::{RemoteError, RemoteInterface};
use futures::future::BoxFuture;
use httprpc::responses::RpcHttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// What an awaited remote method produced.
#[derive(Debug)]
pub enum Reply {
    /// A value to serialize into a Success response.
    Value(Value),
    /// A complete response, returned to the caller verbatim.
    Response(RpcHttpResponse),
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Value(value)
    }
}

impl From<RpcHttpResponse> for Reply {
    fn from(response: RpcHttpResponse) -> Self {
        Reply::Response(response)
    }
}

pub type ReplyFuture = BoxFuture<'static, Result<Reply, RemoteError>>;

/// The result of invoking a remote method by name.
pub enum Invocation {
    /// An asynchronous result handle.
    Deferred(ReplyFuture),
    /// A plain value. Remote methods must never produce this, and the
    /// endpoint rejects it.
    Immediate(Value),
}

impl Invocation {
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<Reply, RemoteError>> + Send + 'static,
    {
        Invocation::Deferred(Box::pin(future))
    }

    /// Wraps a future that yields a value convertible into JSON.
    pub fn deferred_value<F, T>(future: F) -> Self
    where
        F: Future<Output = Result<T, RemoteError>> + Send + 'static,
        T: serde::Serialize,
    {
        Self::deferred(async move {
            let value = future.await?;
            Ok(Reply::Value(serde_json::to_value(value)?))
        })
    }

    /// Short name of the variant, used in failure messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Invocation::Deferred(_) => "Deferred",
            Invocation::Immediate(value) => json_type_name(value),
        }
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Deferred(_) => f.write_str("Invocation::Deferred(..)"),
            Invocation::Immediate(value) => write!(f, "Invocation::Immediate({value})"),
        }
    }
}

/// A server-side object implementing one or more remote interfaces, invoked
/// by method name with positional parameters.
pub trait RemoteObject: Send + Sync {
    /// Name of the implementation as shown in failure messages.
    fn class_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn implements(&self, interface: &RemoteInterface) -> bool;

    /// Invokes `method`. `None` means the implementation has no such method.
    fn dispatch(&self, method: &str, params: Vec<Value>) -> Option<Invocation>;
}

/// Reads the positional parameter at `index`.
pub fn positional_param<T>(params: &[Value], index: usize) -> Result<T, RemoteError>
where
    T: DeserializeOwned,
{
    let value = params.get(index).ok_or_else(|| {
        RemoteError::new(
            "ArgumentCountError",
            format!("Too few arguments: parameter #{index} is missing, {} passed", params.len()),
        )
    })?;

    serde_json::from_value(value.clone()).map_err(|err| {
        RemoteError::new(
            "TypeError",
            format!("Parameter #{index} has an unexpected type: {err}"),
        )
    })
}

/// The JSON type of a value, as reported in failure messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
