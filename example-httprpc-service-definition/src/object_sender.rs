use httprpc_service::{
    Invocation, MethodSignature, RemoteError, RemoteInterface, RemoteObject, positional_param,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OBJECT_SENDER_INTERFACE: RemoteInterface = RemoteInterface::new(
    "ObjectSender",
    &[MethodSignature::deferred("sendObject")],
);

/// A structured value used to exercise object parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: u64,
    pub label: String,
}

/// Accepts any JSON object and acknowledges it with `true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectSender;

impl RemoteObject for ObjectSender {
    fn class_name(&self) -> &'static str {
        "ObjectSender"
    }

    fn implements(&self, interface: &RemoteInterface) -> bool {
        interface.matches(OBJECT_SENDER_INTERFACE.name())
    }

    fn dispatch(&self, method: &str, params: Vec<Value>) -> Option<Invocation> {
        match method {
            "sendObject" => Some(Invocation::deferred_value(async move {
                let object: Value = positional_param(&params, 0)?;
                if !object.is_object() {
                    return Err(RemoteError::new(
                        "TypeError",
                        "Parameter #0 must be an object",
                    ));
                }
                Ok(true)
            })),
            _ => None,
        }
    }
}
