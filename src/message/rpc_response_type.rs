use crate::error::HeaderError;
use crate::message::RpcMessageHeader;
use std::str::FromStr;

/// The outcome a server reports for one call. Exactly one value travels in
/// the [`RpcMessageHeader::ResponseType`] header of every response.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RpcResponseType {
    Success,
    Retry,
    Redirect,
    Throwable,
}

impl RpcResponseType {
    pub const ALL: [RpcResponseType; 4] = [
        RpcResponseType::Success,
        RpcResponseType::Retry,
        RpcResponseType::Redirect,
        RpcResponseType::Throwable,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RpcResponseType::Success => "success",
            RpcResponseType::Retry => "retry",
            RpcResponseType::Redirect => "redirect",
            RpcResponseType::Throwable => "throwable",
        }
    }

    /// Comma-separated list of every accepted wire value, used in error messages.
    pub fn joined_values() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for RpcResponseType {
    type Err = HeaderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| HeaderError::UnknownValue {
                header: RpcMessageHeader::ResponseType,
                value: value.to_string(),
            })
    }
}

impl std::fmt::Display for RpcResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
