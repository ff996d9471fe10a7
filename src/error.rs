use crate::message::{RpcMessageHeader, RpcThrowableType};
use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A malformed or unrecognized protocol header value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("header `{header}` is missing")]
    Missing { header: RpcMessageHeader },
    #[error("header `{header}` has unrecognized value `{value}`")]
    UnknownValue {
        header: RpcMessageHeader,
        value: String,
    },
}

/// The class of a client-observable RPC failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RpcErrorKind {
    /// Protocol or registration error which is not classified further.
    Rpc,
    /// Side effects provably did not occur. Safe to retry against another server.
    Unprocessed,
    /// Side-effect state is unknown. Unsafe to retry blindly.
    PossiblyProcessed,
    /// Side effects occurred but the result was lost.
    Processed,
    /// Terminal: the retry budget was exhausted.
    RetriesCountExceeded,
    /// Terminal: the redirect budget was exhausted.
    RedirectCountExceeded,
}

impl RpcErrorKind {
    /// The class name this kind is reported under when it crosses the wire.
    pub const fn class_name(self) -> &'static str {
        match self {
            RpcErrorKind::Rpc => "RpcException",
            RpcErrorKind::Unprocessed => "UnprocessedCallException",
            RpcErrorKind::PossiblyProcessed => "PossiblyProcessedCallException",
            RpcErrorKind::Processed => "ProcessedCallException",
            RpcErrorKind::RetriesCountExceeded => "RetriesCountExceededException",
            RpcErrorKind::RedirectCountExceeded => "RedirectCountExceededException",
        }
    }
}

impl From<RpcThrowableType> for RpcErrorKind {
    fn from(throwable_type: RpcThrowableType) -> Self {
        match throwable_type {
            RpcThrowableType::Unprocessed => RpcErrorKind::Unprocessed,
            RpcThrowableType::PossiblyProcessed => RpcErrorKind::PossiblyProcessed,
            RpcThrowableType::Processed => RpcErrorKind::Processed,
        }
    }
}

/// Anything that can be reported to a caller as a Throwable response:
/// a class name, a numeric code and a message.
pub trait Throwable {
    fn class_name(&self) -> &str;
    fn code(&self) -> i64;
    fn message(&self) -> &str;
}

/// A classified RPC failure.
///
/// This is a tagged value rather than a hierarchy of exception types: the
/// `kind` says how the failure may be handled, and `previous_class` records
/// the class of whatever caused it. For failures reconstructed from a remote
/// Throwable response, that is the remote class name from the wire, since
/// the original remote error object cannot itself cross the network.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RpcError {
    kind: RpcErrorKind,
    message: String,
    code: i64,
    previous_class: Option<String>,
    source_class: Option<&'static str>,
    #[source]
    source: Option<BoxError>,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: 0,
            previous_class: None,
            source_class: None,
            source: None,
        }
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Rpc, message)
    }

    pub fn unprocessed(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Unprocessed, message)
    }

    pub fn possibly_processed(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::PossiblyProcessed, message)
    }

    pub fn processed(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Processed, message)
    }

    pub fn retries_count_exceeded(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::RetriesCountExceeded, message)
    }

    pub fn redirect_count_exceeded(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::RedirectCountExceeded, message)
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_previous_class(mut self, class_name: impl Into<String>) -> Self {
        self.previous_class = Some(class_name.into());
        self
    }

    /// Attaches the local error that caused this failure. Its type name
    /// becomes the fallback for [`RpcError::previous_class`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source_class = Some(std::any::type_name::<E>());
        self.source = Some(Box::new(source));
        self
    }

    /// Attaches an already boxed source. The concrete type is unknown, so the
    /// fallback class is the supplied label.
    pub fn with_boxed_source(mut self, source: BoxError, source_class: &'static str) -> Self {
        self.source_class = Some(source_class);
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> RpcErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    /// The recorded remote class name if one is set, otherwise the type name
    /// of the wrapped local source.
    pub fn previous_class(&self) -> Option<&str> {
        match self.previous_class.as_deref() {
            Some(class_name) if !class_name.is_empty() => Some(class_name),
            _ => self.source_class,
        }
    }

    pub fn is_unprocessed(&self) -> bool {
        self.kind == RpcErrorKind::Unprocessed
    }

    pub fn is_possibly_processed(&self) -> bool {
        self.kind == RpcErrorKind::PossiblyProcessed
    }

    pub fn is_processed(&self) -> bool {
        self.kind == RpcErrorKind::Processed
    }
}

impl Throwable for RpcError {
    fn class_name(&self) -> &str {
        self.kind.class_name()
    }

    fn code(&self) -> i64 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_previous_class_prefers_recorded_remote_class() {
        let err = RpcError::unprocessed("boom")
            .with_source(io::Error::other("io"))
            .with_previous_class("DivisionByZeroError");
        assert_eq!(err.previous_class(), Some("DivisionByZeroError"));
    }

    #[test]
    fn test_previous_class_falls_back_to_source_type() {
        let err = RpcError::possibly_processed("boom").with_source(io::Error::other("io"));
        assert_eq!(err.previous_class(), Some("std::io::error::Error"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_previous_class_absent() {
        let err = RpcError::rpc("boom");
        assert_eq!(err.previous_class(), None);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_kind_from_throwable_type() {
        assert_eq!(
            RpcErrorKind::from(RpcThrowableType::Processed),
            RpcErrorKind::Processed
        );
    }
}
