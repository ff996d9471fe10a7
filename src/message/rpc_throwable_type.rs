use crate::error::HeaderError;
use crate::message::RpcMessageHeader;
use std::str::FromStr;

/// Classifies a failure by what is known about the remote side effects.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RpcThrowableType {
    /// The remote side provably did not execute the call. Safe to retry elsewhere.
    Unprocessed,
    /// The remote side may have executed the call.
    PossiblyProcessed,
    /// The remote side executed the call but the result could not be returned.
    Processed,
}

impl RpcThrowableType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RpcThrowableType::Unprocessed => "unprocessed",
            RpcThrowableType::PossiblyProcessed => "possiblyProcessed",
            RpcThrowableType::Processed => "processed",
        }
    }
}

impl FromStr for RpcThrowableType {
    type Err = HeaderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unprocessed" => Ok(RpcThrowableType::Unprocessed),
            "possiblyProcessed" => Ok(RpcThrowableType::PossiblyProcessed),
            "processed" => Ok(RpcThrowableType::Processed),
            other => Err(HeaderError::UnknownValue {
                header: RpcMessageHeader::ThrowableType,
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RpcThrowableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
