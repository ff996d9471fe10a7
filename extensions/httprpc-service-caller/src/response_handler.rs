use crate::{RpcClient, TransportResponse, buffer_response_body, rpc_error_from_response};
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Uri};
use httprpc::RpcError;
use httprpc::call::RpcCall;
use httprpc::constants::RPC_HEADER_TRUE;
use httprpc::message::{RpcHeaderMapExt, RpcMessageHeader, RpcResponseType};
use httprpc::utils::{uri_to_target_string, uri_with_host, uri_with_path, uri_with_port};
use serde_json::Value;
use std::time::Duration;

/// Interprets one response of a call, possibly re-entering the client to
/// retry or follow a redirect with the same descriptor.
#[async_trait::async_trait]
pub trait RpcResponseHandlerInterface: Send + Sync {
    async fn handle_response(
        &self,
        response: TransportResponse,
        rpc_call: &mut RpcCall,
        client: &RpcClient,
    ) -> Result<Value, RpcError>;
}

/// The default response interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcResponseHandler;

#[async_trait::async_trait]
impl RpcResponseHandlerInterface for RpcResponseHandler {
    async fn handle_response(
        &self,
        response: TransportResponse,
        rpc_call: &mut RpcCall,
        client: &RpcClient,
    ) -> Result<Value, RpcError> {
        let interface_name = rpc_call.interface_name().to_string();
        let method_name = rpc_call.method_name().to_string();
        let config = client.config();

        // Eviction uses the key recorded on our own request.
        let cache_key = rpc_call.cache_key().map(str::to_owned);
        let evict = || client.remove_item_from_request_to_uri_cache(cache_key.as_deref());

        let inactivity_timeout = rpc_call
            .request
            .as_ref()
            .and_then(|request| request.timeouts())
            .map(|timeouts| timeouts.inactivity);

        let (parts, body) = response.into_parts();
        let status = parts.status;
        let headers = parts.headers;

        let response_type = headers
            .get_rpc(RpcMessageHeader::ResponseType)
            .and_then(|value| value.parse::<RpcResponseType>().ok());

        let Some(response_type) = response_type else {
            evict();
            return Err(RpcError::possibly_processed(format!(
                "Failed RPC call to {interface_name}::{method_name}() because RPC response type \
                 header value is missing or is not one of these: {}.",
                RpcResponseType::joined_values()
            )));
        };

        if response_type == RpcResponseType::Throwable {
            evict();
            // An unreadable body is reported like an empty one.
            let message = match buffer_response_body(body, inactivity_timeout).await {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(
                        interface = %interface_name,
                        method = %method_name,
                        error = %err,
                        "failed to read throwable response body"
                    );
                    Bytes::new()
                }
            };
            return Err(rpc_error_from_response(&headers, &message));
        }

        if status.is_server_error() || response_type == RpcResponseType::Retry {
            if rpc_call.bump_retrying_count() < config.retrying_limit() {
                let delay = headers
                    .get_rpc(RpcMessageHeader::RetryWithDelay)
                    .and_then(|delay| delay.trim().parse::<u64>().ok())
                    .filter(|delay| *delay > 0)
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| config.retrying_delay());

                tracing::debug!(
                    interface = %interface_name,
                    method = %method_name,
                    attempt = rpc_call.retrying_count,
                    status = status.as_u16(),
                    delay_ms = delay.as_millis() as u64,
                    "retrying rpc call"
                );

                tokio::time::sleep(delay).await;
                return client.call(rpc_call).await;
            }

            evict();

            if status.is_server_error() {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). Status code: {}. Reason: {}.",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )));
            }

            if config.retrying_limit() == 0 {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). This request is not allowed retries."
                )));
            }

            return Err(RpcError::retries_count_exceeded(format!(
                "Failed RPC call for {interface_name}::{method_name}(). Maximum number of retries ({}) exceeded.",
                config.retrying_limit()
            )));
        }

        let content = match buffer_response_body(body, inactivity_timeout).await {
            Ok(content) => content,
            Err(err) => {
                evict();
                return Err(RpcError::possibly_processed(format!(
                    "Failed to buffer RPC result for {interface_name}::{method_name}(). Error message: {err}."
                ))
                .with_boxed_source(err, "ResponseBodyError"));
            }
        };

        let result = if content.is_empty() {
            Value::Null
        } else if headers.contains_rpc(RpcMessageHeader::WithSerializedContent) {
            match client.serializer().deserialize(&content) {
                Ok(value) => value,
                Err(err) => {
                    evict();
                    return Err(RpcError::possibly_processed(format!(
                        "Failed to deserialize RPC result for {interface_name}::{method_name}(). Error message: {err}."
                    ))
                    .with_source(err));
                }
            }
        } else {
            Value::String(String::from_utf8_lossy(&content).into_owned())
        };

        if status != StatusCode::OK {
            evict();
            return Err(RpcError::possibly_processed(format!(
                "Failed RPC call to {interface_name}::{method_name}() due to an unexpected HTTP status code: {}. \
                 Reason: {}. \r\n {}.",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                String::from_utf8_lossy(&content)
            )));
        }

        if response_type == RpcResponseType::Redirect {
            if rpc_call.request.is_none() {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). RpcCall object does not contain Request object"
                )));
            }

            if config.redirects_limit() == 0 {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). This request is not allowed to follow redirect"
                )));
            }

            if rpc_call.bump_redirection_count() > config.redirects_limit() {
                evict();
                return Err(RpcError::redirect_count_exceeded(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). Maximum number of redirects ({}) exceeded.",
                    config.redirects_limit()
                )));
            }

            let Some(request) = rpc_call.request.as_mut() else {
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). RpcCall object does not contain Request object"
                )));
            };

            if headers.contains_rpc(RpcMessageHeader::DirectDirection) {
                request.set_rpc_header(RpcMessageHeader::DirectDirection, RPC_HEADER_TRUE);
            }

            let Some(host) = headers.get_rpc(RpcMessageHeader::RedirectToHostOrIp) else {
                evict();
                return Err(RpcError::unprocessed(format!(
                    "Failed RPC call for {interface_name}::{method_name}(). {} request header not specified.",
                    RpcMessageHeader::RedirectToHostOrIp
                )));
            };

            let redirect_uri = match redirect_target(request.uri(), host, &headers) {
                Ok(uri) => uri,
                Err(reason) => {
                    evict();
                    return Err(RpcError::unprocessed(format!(
                        "Failed RPC call for {interface_name}::{method_name}(). Invalid redirect target: {reason}."
                    )));
                }
            };

            tracing::debug!(
                interface = %interface_name,
                method = %method_name,
                redirection_count = rpc_call.redirection_count,
                target = %redirect_uri,
                "following rpc redirect"
            );

            client.put_item_to_request_to_uri_cache(
                cache_key.as_deref(),
                uri_to_target_string(&redirect_uri),
            );
            request.set_uri(redirect_uri);

            return client.call(rpc_call).await;
        }

        Ok(result)
    }
}

/// Rewrites `uri` to point at the host, path and port named by the
/// redirect headers. Absent path or port headers leave those parts as is.
fn redirect_target(uri: &Uri, host: &str, headers: &HeaderMap) -> Result<Uri, String> {
    let mut uri = uri_with_host(uri, host).map_err(|err| err.to_string())?;

    if let Some(path) = headers.get_rpc(RpcMessageHeader::RedirectToPath) {
        uri = uri_with_path(&uri, path).map_err(|err| err.to_string())?;
    }

    if let Some(port) = headers.get_rpc(RpcMessageHeader::RedirectToPort) {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| format!("port `{port}` is not valid"))?;
        uri = uri_with_port(&uri, port).map_err(|err| err.to_string())?;
    }

    Ok(uri)
}
