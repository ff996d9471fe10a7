/// Value carried by boolean protocol headers such as
/// `rpc-serialized-content` and `directDirection`.
pub const RPC_HEADER_TRUE: &str = "true";

/// Default capacity of the request-to-target cache.
pub const DEFAULT_REQUEST_TO_URI_CACHE_CAPACITY: usize = 100;

/// Separates the host from the interface name in a cache key.
pub const CACHE_KEY_HOST_SEPARATOR: &str = "->";

/// Separates the interface name from the method name in a cache key.
pub const CACHE_KEY_METHOD_SEPARATOR: &str = "::";

/// Prefixes the optional target entity id in a cache key.
pub const CACHE_KEY_ENTITY_SEPARATOR: &str = "_";
