use crate::{RegistryError, RemoteInterface, RemoteObject, ReturnKind};
use httprpc::BoxError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub type RemoteObjectFactory =
    Arc<dyn Fn() -> Result<Arc<dyn RemoteObject>, BoxError> + Send + Sync>;

/// A registered implementation of one remote interface.
pub struct RemoteObjectRegistration {
    interface: RemoteInterface,
    class_name: &'static str,
    factory: RemoteObjectFactory,
}

impl RemoteObjectRegistration {
    pub fn interface(&self) -> &RemoteInterface {
        &self.interface
    }

    /// Name of the implementing type.
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Produces a fresh instance of the implementation.
    pub fn instantiate(&self) -> Result<Arc<dyn RemoteObject>, BoxError> {
        (self.factory)()
    }
}

impl std::fmt::Debug for RemoteObjectRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteObjectRegistration")
            .field("interface", &self.interface.name())
            .field("class_name", &self.class_name)
            .finish()
    }
}

/// Maps remote interface names to the objects implementing them.
///
/// Names are matched ignoring ASCII case. Shared by every server that
/// dispatches calls against it.
#[derive(Default)]
pub struct RpcRegistry {
    remote_objects: RwLock<HashMap<String, Arc<RemoteObjectRegistration>>>,
}

impl RpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an implementation whose construction cannot fail.
    pub fn register_remote_object<O, F>(
        &self,
        interface: RemoteInterface,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        O: RemoteObject + 'static,
        F: Fn() -> O + Send + Sync + 'static,
    {
        self.register_fallible_remote_object(interface, move || {
            Ok(Arc::new(factory()) as Arc<dyn RemoteObject>)
        })
    }

    /// Registers an implementation through a factory that may fail.
    ///
    /// The factory runs once here to verify that the produced object
    /// implements `interface`, and then once per dispatched call.
    pub fn register_fallible_remote_object<F>(
        &self,
        interface: RemoteInterface,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<Arc<dyn RemoteObject>, BoxError> + Send + Sync + 'static,
    {
        let key = interface.name().to_ascii_lowercase();

        if self.remote_objects.read().contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered {
                interface: interface.name().to_string(),
            });
        }

        let sample = factory().map_err(|source| RegistryError::Instantiation {
            interface: interface.name().to_string(),
            source,
        })?;

        if !sample.implements(&interface) {
            return Err(RegistryError::NotImplemented {
                interface: interface.name().to_string(),
                class: sample.class_name().to_string(),
            });
        }

        check_methods_signature(&interface)?;

        let registration = Arc::new(RemoteObjectRegistration {
            interface,
            class_name: sample.class_name(),
            factory: Arc::new(factory),
        });

        // Re-checked under the write lock; a concurrent registration may have won.
        let mut remote_objects = self.remote_objects.write();
        if remote_objects.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered {
                interface: interface.name().to_string(),
            });
        }
        remote_objects.insert(key, registration);

        tracing::debug!(
            interface = interface.name(),
            class = sample.class_name(),
            "registered remote object"
        );

        Ok(())
    }

    pub fn get_remote_object(&self, interface_name: &str) -> Option<Arc<RemoteObjectRegistration>> {
        self.remote_objects
            .read()
            .get(&interface_name.to_ascii_lowercase())
            .cloned()
    }

    pub fn clear_registry(&self) {
        self.remote_objects.write().clear();
    }

    pub fn len(&self) -> usize {
        self.remote_objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.remote_objects.read().is_empty()
    }
}

impl std::fmt::Debug for RpcRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.remote_objects.read().values())
            .finish()
    }
}

/// Every method must return a non-nullable deferred result, since the
/// endpoint awaits whatever a remote method returns.
fn check_methods_signature(interface: &RemoteInterface) -> Result<(), RegistryError> {
    match interface
        .methods()
        .iter()
        .find(|method| method.returns() != ReturnKind::Deferred)
    {
        Some(method) => Err(RegistryError::InvalidSignature {
            interface: interface.name().to_string(),
            method: method.name().to_string(),
        }),
        None => Ok(()),
    }
}
