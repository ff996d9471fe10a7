pub const DEFAULT_REDIRECTS_LIMIT: u32 = 10;
pub const DEFAULT_RETRYING_LIMIT: u32 = 10;
pub const DEFAULT_RETRYING_DELAY_IN_MS: u64 = 400;

/// Placeholder message for a Throwable response with an empty body.
pub const EMPTY_THROWABLE_MESSAGE: &str = "Throwable message is empty";
