use crate::SerializationError;
use bytes::Bytes;
use serde_json::Value;

/// Codec used for call parameters and results.
pub trait RpcSerializer: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<Bytes, SerializationError>;

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RpcSerializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Bytes, SerializationError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|err| SerializationError::Serialize(Box::new(err)))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializationError> {
        serde_json::from_slice(bytes).map_err(|err| SerializationError::Deserialize(Box::new(err)))
    }
}
