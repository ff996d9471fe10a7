use http::HeaderName;

/// The fixed vocabulary of protocol headers exchanged between an RPC client
/// and an RPC server.
///
/// Every name is prefixed or camel-cased so that it never collides with a
/// generic HTTP header used by the transport itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RpcMessageHeader {
    /// Carries one [`RpcResponseType`](crate::message::RpcResponseType) tag. Always present on responses.
    ResponseType,
    /// Set to `"true"` when the body is a serialized result.
    WithSerializedContent,

    ThrowableType,
    ThrowableCode,
    ThrowableClass,

    RpcRemoteInterfaceClassName,
    RpcRemoteMethodName,

    /// Required on redirect responses.
    RedirectToHostOrIp,
    RedirectToPath,
    RedirectToPort,
    /// Marks a redirect issued by a specific relay; the next hop should not redirect again.
    DirectDirection,

    /// Server-suggested retry delay, in milliseconds.
    RetryWithDelay,

    /// Stringified target entity id, forwarded as a routing/sharding hint.
    TargetEntity,

    RequestToUriCacheKey,
}

impl RpcMessageHeader {
    pub const ALL: [RpcMessageHeader; 14] = [
        RpcMessageHeader::ResponseType,
        RpcMessageHeader::WithSerializedContent,
        RpcMessageHeader::ThrowableType,
        RpcMessageHeader::ThrowableCode,
        RpcMessageHeader::ThrowableClass,
        RpcMessageHeader::RpcRemoteInterfaceClassName,
        RpcMessageHeader::RpcRemoteMethodName,
        RpcMessageHeader::RedirectToHostOrIp,
        RpcMessageHeader::RedirectToPath,
        RpcMessageHeader::RedirectToPort,
        RpcMessageHeader::DirectDirection,
        RpcMessageHeader::RetryWithDelay,
        RpcMessageHeader::TargetEntity,
        RpcMessageHeader::RequestToUriCacheKey,
    ];

    /// The canonical wire spelling of the header.
    pub const fn as_str(self) -> &'static str {
        match self {
            RpcMessageHeader::ResponseType => "rpc-response-type",
            RpcMessageHeader::WithSerializedContent => "rpc-serialized-content",
            RpcMessageHeader::ThrowableType => "rpc-throwable-type",
            RpcMessageHeader::ThrowableCode => "rpc-throwable-code",
            RpcMessageHeader::ThrowableClass => "rpc-throwable-class",
            RpcMessageHeader::RpcRemoteInterfaceClassName => "rpc-interface-class-name",
            RpcMessageHeader::RpcRemoteMethodName => "rpc-method-name",
            RpcMessageHeader::RedirectToHostOrIp => "redirect-to-host-or-ip",
            RpcMessageHeader::RedirectToPath => "redirect-to-path",
            RpcMessageHeader::RedirectToPort => "redirect-to-port",
            RpcMessageHeader::DirectDirection => "directDirection",
            RpcMessageHeader::RetryWithDelay => "retry-with-delay",
            RpcMessageHeader::TargetEntity => "targetEntity",
            RpcMessageHeader::RequestToUriCacheKey => "requestToUriCacheKey",
        }
    }

    /// The header as an [`http::HeaderName`].
    ///
    /// HTTP header names are case-insensitive, and `http` stores them
    /// lower-cased, so the camel-cased names are normalized here.
    pub fn header_name(self) -> HeaderName {
        match self {
            RpcMessageHeader::DirectDirection => HeaderName::from_static("directdirection"),
            RpcMessageHeader::TargetEntity => HeaderName::from_static("targetentity"),
            RpcMessageHeader::RequestToUriCacheKey => {
                HeaderName::from_static("requesttouricachekey")
            }
            other => HeaderName::from_static(other.as_str()),
        }
    }
}

impl std::fmt::Display for RpcMessageHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_header_names_are_unique() {
        let names: HashSet<HeaderName> = RpcMessageHeader::ALL
            .iter()
            .map(|h| h.header_name())
            .collect();
        assert_eq!(names.len(), RpcMessageHeader::ALL.len());
    }

    #[test]
    fn test_header_names_do_not_shadow_transport_headers() {
        let transport_headers = [
            http::header::CONTENT_TYPE,
            http::header::CONTENT_LENGTH,
            http::header::HOST,
            http::header::LOCATION,
            http::header::RETRY_AFTER,
            http::header::CONNECTION,
        ];

        for header in RpcMessageHeader::ALL {
            assert!(
                !transport_headers.contains(&header.header_name()),
                "{header} collides with a transport header"
            );
        }
    }

    #[test]
    fn test_camel_cased_names_normalize_to_lowercase() {
        assert_eq!(
            RpcMessageHeader::DirectDirection.header_name().as_str(),
            "directdirection"
        );
        assert_eq!(RpcMessageHeader::TargetEntity.as_str(), "targetEntity");
    }
}
