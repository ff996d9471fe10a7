use crate::constants::{
    CACHE_KEY_ENTITY_SEPARATOR, CACHE_KEY_HOST_SEPARATOR, CACHE_KEY_METHOD_SEPARATOR,
    DEFAULT_REQUEST_TO_URI_CACHE_CAPACITY,
};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Builds the request-to-target cache key
/// `host->InterfaceName::methodName[_entityId]`.
///
/// An empty entity id is treated as absent.
pub fn build_request_to_uri_cache_key(
    host_name: &str,
    interface_name: &str,
    method_name: &str,
    target_entity_id: Option<&str>,
) -> String {
    let mut key = String::with_capacity(
        host_name.len()
            + interface_name.len()
            + method_name.len()
            + target_entity_id.map_or(0, |id| id.len() + 1)
            + 4,
    );

    key.push_str(host_name);
    key.push_str(CACHE_KEY_HOST_SEPARATOR);
    key.push_str(interface_name);
    key.push_str(CACHE_KEY_METHOD_SEPARATOR);
    key.push_str(method_name);

    if let Some(entity_id) = target_entity_id.filter(|id| !id.is_empty()) {
        key.push_str(CACHE_KEY_ENTITY_SEPARATOR);
        key.push_str(entity_id);
    }

    key
}

/// Bounded least-recently-used map from a cache key to a resolved target
/// (an IP address or an absolute redirect URI).
///
/// Shared by every call of a client. Each operation holds the lock only for
/// its own duration.
#[derive(Debug)]
pub struct RequestToUriCache {
    entries: Mutex<LruCache<String, String>>,
}

impl Default for RequestToUriCache {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TO_URI_CACHE_CAPACITY)
    }
}

impl RequestToUriCache {
    /// Creates a cache holding at most `capacity` entries. A capacity of zero
    /// is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up a target and marks it as most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        let target = self.entries.lock().get(key).cloned();
        if target.is_some() {
            tracing::trace!(cache_key = key, "request-to-uri cache hit");
        }
        target
    }

    pub fn put(&self, key: impl Into<String>, target: impl Into<String>) {
        self.entries.lock().put(key.into(), target.into());
    }

    /// Evicts an entry. Evicting a missing key is a no-op.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.lock().pop(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
