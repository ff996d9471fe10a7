use httprpc::{BoxError, Throwable};

/// Reasons a remote object cannot be registered.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Remote object implementing the interface {interface} is already registered.")]
    AlreadyRegistered { interface: String },

    #[error(
        "Invalid remote object registration for {interface}, because {class} does not implement {interface}."
    )]
    NotImplemented { interface: String, class: String },

    #[error("{interface}::{method}() must declare a non-nullable deferred return.")]
    InvalidSignature { interface: String, method: String },

    #[error("Invalid remote object registration for {interface}, because its factory failed: {source}")]
    Instantiation {
        interface: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("failed to serialize value: {0}")]
    Serialize(#[source] BoxError),
    #[error("failed to deserialize value: {0}")]
    Deserialize(#[source] BoxError),
}

/// A domain failure raised by a remote method.
///
/// It crosses the wire as the throwable class header, the throwable code
/// header and the response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{class}: {message}")]
pub struct RemoteError {
    pub class: String,
    pub message: String,
    pub code: i64,
}

impl RemoteError {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            code: 0,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }
}

impl Throwable for RemoteError {
    fn class_name(&self) -> &str {
        &self.class
    }

    fn code(&self) -> i64 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::new("SerializationError", err.to_string())
    }
}
