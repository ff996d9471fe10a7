use httprpc_service::{
    Invocation, MethodSignature, RemoteInterface, RemoteObject, positional_param,
};
use serde_json::Value;

pub const CLIENT_REPOSITORY_INTERFACE: RemoteInterface = RemoteInterface::new(
    "ClientRepository",
    &[MethodSignature::deferred("getClientName")],
);

#[derive(Debug, Default, Clone, Copy)]
pub struct ClientRepository;

impl RemoteObject for ClientRepository {
    fn class_name(&self) -> &'static str {
        "ClientRepository"
    }

    fn implements(&self, interface: &RemoteInterface) -> bool {
        interface.matches(CLIENT_REPOSITORY_INTERFACE.name())
    }

    fn dispatch(&self, method: &str, params: Vec<Value>) -> Option<Invocation> {
        match method {
            "getClientName" => Some(Invocation::deferred_value(async move {
                let _client_id: i64 = positional_param(&params, 0)?;
                Ok("Boris")
            })),
            _ => None,
        }
    }
}
