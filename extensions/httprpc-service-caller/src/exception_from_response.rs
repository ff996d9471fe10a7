use crate::constants::EMPTY_THROWABLE_MESSAGE;
use http::HeaderMap;
use httprpc::message::{RpcHeaderMapExt, RpcMessageHeader, RpcThrowableType};
use httprpc::{RpcError, RpcErrorKind};

/// Rebuilds a classified error from a Throwable response.
///
/// The throwable type selects the error kind and defaults to possibly
/// processed when missing or invalid. The remote class name is kept as the
/// error's previous class, since the remote error itself cannot cross the
/// wire.
pub fn rpc_error_from_response(headers: &HeaderMap, body: &[u8]) -> RpcError {
    let mut message = String::new();

    let throwable_type = match headers
        .get_rpc(RpcMessageHeader::ThrowableType)
        .unwrap_or_default()
        .parse::<RpcThrowableType>()
    {
        Ok(throwable_type) => throwable_type,
        Err(_) => {
            message.push_str("Failed to get throwable type from response header. ");
            RpcThrowableType::PossiblyProcessed
        }
    };

    let code = headers
        .get_rpc(RpcMessageHeader::ThrowableCode)
        .and_then(|code| code.trim().parse::<i64>().ok())
        .unwrap_or(0);

    let throwable_message = String::from_utf8_lossy(body);
    let throwable_message = if throwable_message.is_empty() {
        EMPTY_THROWABLE_MESSAGE
    } else {
        throwable_message.as_ref()
    };
    message.push_str(&format!("Throwable message: {throwable_message}. "));

    let throwable_class = headers.get_rpc(RpcMessageHeader::ThrowableClass);
    match throwable_class {
        Some(class_name) => message = format!("Throwable class: {class_name}. {message}"),
        None => message.push_str("Failed to get throwable class from response header. "),
    }

    let error = RpcError::new(RpcErrorKind::from(throwable_type), message).with_code(code);
    match throwable_class.filter(|class_name| !class_name.is_empty()) {
        Some(class_name) => error.with_previous_class(class_name),
        None => error,
    }
}
