use crate::message::RpcMessageHeader;
use http::{HeaderMap, HeaderValue};

/// Typed access to protocol headers on any [`HeaderMap`].
pub trait RpcHeaderMapExt {
    /// Returns the header value if present and valid UTF-8.
    fn get_rpc(&self, header: RpcMessageHeader) -> Option<&str>;

    fn contains_rpc(&self, header: RpcMessageHeader) -> bool;

    /// Sets (replaces) a protocol header.
    fn set_rpc(&mut self, header: RpcMessageHeader, value: &str);
}

impl RpcHeaderMapExt for HeaderMap {
    fn get_rpc(&self, header: RpcMessageHeader) -> Option<&str> {
        self.get(header.header_name())
            .and_then(|value| value.to_str().ok())
    }

    fn contains_rpc(&self, header: RpcMessageHeader) -> bool {
        self.contains_key(header.header_name())
    }

    fn set_rpc(&mut self, header: RpcMessageHeader, value: &str) {
        self.insert(header.header_name(), to_header_value(value));
    }
}

/// Converts arbitrary text into a header value.
///
/// Control characters become spaces and non-ASCII characters become `?`,
/// since header values are restricted to visible ASCII.
pub fn to_header_value(value: &str) -> HeaderValue {
    let cleaned: String = value
        .chars()
        .map(|c| match c {
            '\t' => c,
            c if c.is_ascii_control() => ' ',
            c if !c.is_ascii() => '?',
            c => c,
        })
        .collect();

    HeaderValue::from_str(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut headers = HeaderMap::new();
        headers.set_rpc(RpcMessageHeader::TargetEntity, "777");
        assert_eq!(headers.get_rpc(RpcMessageHeader::TargetEntity), Some("777"));
        assert!(headers.contains_rpc(RpcMessageHeader::TargetEntity));
        assert!(!headers.contains_rpc(RpcMessageHeader::DirectDirection));
    }

    #[test]
    fn test_control_characters_are_replaced() {
        let value = to_header_value("line one\r\nline two");
        assert_eq!(value.to_str().unwrap(), "line one  line two");
    }

    #[test]
    fn test_non_ascii_is_replaced() {
        assert_eq!(to_header_value("café").to_str().unwrap(), "caf?");
    }
}
