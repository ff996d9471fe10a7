mod registry;
pub use registry::*;

mod remote_interface;
pub use remote_interface::*;

mod remote_object;
pub use remote_object::*;

mod serializer;
pub use serializer::*;

pub mod error;
pub use error::{RegistryError, RemoteError, SerializationError};
