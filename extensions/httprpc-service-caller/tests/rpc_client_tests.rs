mod support;

use bytes::Bytes;
use httprpc::RpcErrorKind;
use http::StatusCode;
use httprpc::message::{RpcHeaderMapExt, RpcMessageHeader, RpcResponseType};
use httprpc::responses::{
    RedirectRpcResponseFactory, ResponseBuilder, ResponseFactory, RetryRpcResponseFactory,
    RpcHttpResponse,
};
use httprpc_service::{RpcSerializer, SerializationError};
use httprpc::call::OutboundRequest;
use httprpc_service_caller::{RpcClient, RpcTransport, TransportError, TransportResponse};
use httprpc_service_endpoint::{Intercept, request_interceptor};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use support::*;

#[tokio::test]
async fn test_successful_call_returns_result_and_caches_target() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config(),
    );

    let result = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap();
    assert_eq!(result, json!(12));
    assert_eq!(
        h.client.get_item_from_request_to_uri_cache("rpc.local->SimpleCalc::add"),
        Some("http://10.0.0.1:8181".to_string())
    );

    let sent = h.transport.sent();
    assert_eq!(
        sent[0].rpc_header(RpcMessageHeader::RequestToUriCacheKey),
        Some("rpc.local->SimpleCalc::add")
    );
    assert_eq!(sent[0].rpc_header(RpcMessageHeader::RpcRemoteInterfaceClassName), Some("SimpleCalc"));
    assert_eq!(sent[0].rpc_header(RpcMessageHeader::RpcRemoteMethodName), Some("add"));
    assert_eq!(sent[0].body().as_ref(), b"[5,7]");

    // The cached target skips resolution.
    let result = h.client.invoke("SimpleCalc", "add", vec![json!(1), json!(2)]).await.unwrap();
    assert_eq!(result, json!(3));
    assert_eq!(h.dns.lookups(), 1);
}

#[tokio::test]
async fn test_target_entity_id_is_forwarded_and_keyed() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config().with_target_entity_id_param_position(Some(0)),
    );

    let result = h
        .client
        .invoke("ClientRepository", "getClientName", vec![json!(777)])
        .await
        .unwrap();
    assert_eq!(result, json!("Boris"));

    let sent = h.transport.sent();
    assert_eq!(sent[0].rpc_header(RpcMessageHeader::TargetEntity), Some("777"));
    assert_eq!(sent[0].cache_key(), Some("rpc.local->ClientRepository::getClientName_777"));
    assert!(
        h.client
            .request_to_uri_cache()
            .contains("rpc.local->ClientRepository::getClientName_777")
    );
}

#[tokio::test]
async fn test_always_retrying_server_exhausts_retry_budget() {
    let handler = request_handler();
    let attempts = Arc::new(AtomicUsize::new(0));
    {
        let attempts = attempts.clone();
        handler.register_interceptor(request_interceptor(move |_request, _id| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Intercept::Respond(RetryRpcResponseFactory::new(Some(1)).get_response())) }
        }));
    }

    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, handler),
        fast_config().with_retrying_limit(3),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::RetriesCountExceeded);
    assert_eq!(
        err.message(),
        "Failed RPC call for SimpleCalc::add(). Maximum number of retries (3) exceeded."
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert!(h.client.request_to_uri_cache().is_empty());
}

#[tokio::test]
async fn test_single_retry_is_transparent() {
    let handler = request_handler();
    let do_retry = Arc::new(AtomicBool::new(true));
    {
        let do_retry = do_retry.clone();
        handler.register_interceptor(request_interceptor(move |request, _id| {
            let retry = do_retry.swap(false, Ordering::SeqCst);
            async move {
                if retry {
                    return Ok(Intercept::Respond(RetryRpcResponseFactory::default().get_response()));
                }
                Ok(Intercept::Continue(request))
            }
        }));
    }

    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, handler),
        fast_config(),
    );

    let result = h.client.invoke("SimpleCalc", "mul", vec![json!(6), json!(7)]).await.unwrap();
    assert_eq!(result, json!(42));
    assert_eq!(h.transport.sent_count(), 2);
}

#[tokio::test]
async fn test_retry_signal_with_zero_limit_is_unprocessed() {
    let handler = request_handler();
    handler.register_interceptor(request_interceptor(|_request, _id| async move {
        Ok(Intercept::Respond(RetryRpcResponseFactory::default().get_response()))
    }));

    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, handler),
        fast_config().with_retrying_limit(0),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(1), json!(1)]).await.unwrap_err();
    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert_eq!(
        err.message(),
        "Failed RPC call for SimpleCalc::add(). This request is not allowed retries."
    );
    assert_eq!(h.transport.sent_count(), 1);
}

#[tokio::test]
async fn test_always_redirecting_server_exhausts_redirect_budget() {
    let handler = request_handler();
    let hops = Arc::new(AtomicUsize::new(0));
    {
        let hops = hops.clone();
        handler.register_interceptor(request_interceptor(move |_request, _id| {
            hops.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(Intercept::Respond(
                    RedirectRpcResponseFactory::new("10.0.0.1").with_port(8181).get_response(),
                ))
            }
        }));
    }

    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, handler),
        fast_config().with_redirects_limit(3),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::RedirectCountExceeded);
    assert_eq!(
        err.message(),
        "Failed RPC call for SimpleCalc::add(). Maximum number of redirects (3) exceeded."
    );
    assert_eq!(hops.load(Ordering::SeqCst), 5);
    assert!(h.client.request_to_uri_cache().is_empty());
}

#[tokio::test]
async fn test_redirect_signal_with_zero_limit_is_unprocessed() {
    let handler = request_handler();
    handler.register_interceptor(request_interceptor(|_request, _id| async move {
        Ok(Intercept::Respond(RedirectRpcResponseFactory::new("10.0.0.2").get_response()))
    }));

    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, handler),
        fast_config().with_redirects_limit(0),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();
    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert_eq!(
        err.message(),
        "Failed RPC call for SimpleCalc::add(). This request is not allowed to follow redirect"
    );
}

#[tokio::test]
async fn test_direct_direction_redirect_reaches_second_server() {
    let first = request_handler();
    first.register_interceptor(request_interceptor(|_request, _id| async move {
        Ok(Intercept::Respond(
            RedirectRpcResponseFactory::new("10.0.0.2")
                .with_port(8182)
                .with_direct_direction(true)
                .get_response(),
        ))
    }));

    let h = harness(
        InMemoryTransport::new()
            .with_route(FIRST_SERVER, first)
            .with_route(SECOND_SERVER, request_handler()),
        fast_config(),
    );

    let result = h.client.invoke("SimpleCalc", "sub", vec![json!(9), json!(4)]).await.unwrap();
    assert_eq!(result, json!(5));

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].rpc_header(RpcMessageHeader::DirectDirection), None);
    assert_eq!(sent[1].rpc_header(RpcMessageHeader::DirectDirection), Some("true"));
    assert_eq!(sent[1].uri().authority().unwrap().as_str(), SECOND_SERVER);

    // The redirect target is remembered for the next call.
    assert_eq!(
        h.client.get_item_from_request_to_uri_cache("rpc.local->SimpleCalc::sub"),
        Some("http://10.0.0.2:8182".to_string())
    );
    let result = h.client.invoke("SimpleCalc", "sub", vec![json!(3), json!(4)]).await.unwrap();
    assert_eq!(result, json!(-1));
    assert_eq!(
        h.transport.sent()[2].uri().authority().unwrap().as_str(),
        SECOND_SERVER
    );
}

#[tokio::test]
async fn test_remote_error_is_reconstructed_with_remote_class() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config(),
    );

    let err = h.client.invoke("SimpleCalc", "div", vec![json!(4), json!(0)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::PossiblyProcessed);
    assert_eq!(err.previous_class(), Some("DivisionByZeroError"));
    assert_eq!(
        err.message(),
        "Throwable class: DivisionByZeroError. Throwable message: Division by zero. "
    );
    assert!(h.client.request_to_uri_cache().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_retried_then_succeeds() {
    let h = harness(
        InMemoryTransport::new()
            .with_route(FIRST_SERVER, request_handler())
            .with_unreachable_attempts(2),
        fast_config().with_retrying_limit(3),
    );

    let result = h.client.invoke("SimpleCalc", "add", vec![json!(2), json!(2)]).await.unwrap();
    assert_eq!(result, json!(4));
    assert_eq!(h.transport.sent_count(), 3);
}

#[tokio::test]
async fn test_unreachable_server_evicts_cached_target() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config().with_retrying_limit(0),
    );

    h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap();
    assert!(h.client.request_to_uri_cache().contains("rpc.local->SimpleCalc::add"));

    h.transport.set_unreachable_attempts(1);
    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert_eq!(err.previous_class(), Some("UnprocessedRequest"));
    assert!(!h.client.request_to_uri_cache().contains("rpc.local->SimpleCalc::add"));
}

#[tokio::test]
async fn test_timed_out_call_is_possibly_processed() {
    let h = harness(
        InMemoryTransport::new()
            .with_route(FIRST_SERVER, request_handler())
            .with_response_delay(Duration::from_millis(500)),
        fast_config().with_request_timeout(Some(Duration::from_millis(20))),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();
    assert_eq!(err.kind(), RpcErrorKind::PossiblyProcessed);
    assert_eq!(h.transport.sent_count(), 1);
}

#[tokio::test]
async fn test_unknown_host_fails_unprocessed_before_sending() {
    let h = harness(InMemoryTransport::new(), fast_config());
    let client = RpcClient::new(
        "http://missing.local:8181".parse().unwrap(),
        h.transport.clone(),
        h.dns.clone(),
    );

    let err = client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();
    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert!(err.message().contains("Failed to get ip from hostname 'missing.local'"));
    assert_eq!(h.transport.sent_count(), 0);
}

struct FailingSerializer;

impl RpcSerializer for FailingSerializer {
    fn serialize(&self, _value: &Value) -> Result<Bytes, SerializationError> {
        Err(SerializationError::Serialize("unsupported value".into()))
    }

    fn deserialize(&self, _bytes: &[u8]) -> Result<Value, SerializationError> {
        Err(SerializationError::Deserialize("unsupported value".into()))
    }
}

#[tokio::test]
async fn test_unserializable_parameters_fail_unprocessed_before_sending() {
    let h = harness(InMemoryTransport::new(), fast_config());
    let client = RpcClient::new(
        "http://10.0.0.1:8181".parse().unwrap(),
        h.transport.clone(),
        h.dns.clone(),
    )
    .with_serializer(Arc::new(FailingSerializer));

    let err = client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();
    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert!(err.message().starts_with(
        "Failed RPC call for SimpleCalc::add() due to request building fail."
    ));
    assert_eq!(h.transport.sent_count(), 0);
    assert_eq!(h.dns.lookups(), 0);
}

#[tokio::test]
async fn test_ip_entry_host_has_no_cache_key() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config(),
    );
    let client = RpcClient::new(
        "http://10.0.0.1:8181".parse().unwrap(),
        h.transport.clone(),
        h.dns.clone(),
    );

    let result = client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap();
    assert_eq!(result, json!(12));
    assert_eq!(h.transport.sent()[0].cache_key(), None);
    assert!(client.request_to_uri_cache().is_empty());
    assert_eq!(h.dns.lookups(), 0);
}

#[tokio::test]
async fn test_non_ascii_entity_id_hits_cache_under_its_own_key() {
    let h = harness(
        InMemoryTransport::new().with_route(FIRST_SERVER, request_handler()),
        fast_config().with_target_entity_id_param_position(Some(1)),
    );

    for _ in 0..2 {
        let result = h
            .client
            .invoke("ClientRepository", "getClientName", vec![json!(1), json!("Žofie")])
            .await
            .unwrap();
        assert_eq!(result, json!("Boris"));
    }
    assert_eq!(h.dns.lookups(), 1);

    h.client
        .invoke("ClientRepository", "getClientName", vec![json!(1), json!("Šofie")])
        .await
        .unwrap();
    assert_eq!(h.dns.lookups(), 2);

    let cache = h.client.request_to_uri_cache();
    assert_eq!(cache.len(), 2);
    assert!(cache.contains("rpc.local->ClientRepository::getClientName_Žofie"));
    assert!(cache.contains("rpc.local->ClientRepository::getClientName_Šofie"));
    assert_eq!(
        h.transport.sent()[0].cache_key(),
        Some("rpc.local->ClientRepository::getClientName_Žofie")
    );
}

const ADD_CACHE_KEY: &str = "rpc.local->SimpleCalc::add";

/// A harness whose first server answers every call with `response`, with
/// the `add` route already cached.
fn responding_harness(
    response: fn() -> RpcHttpResponse,
    config: httprpc_service_caller::RpcClientConfig,
) -> (Harness, Arc<AtomicUsize>) {
    let handler = request_handler();
    let attempts = Arc::new(AtomicUsize::new(0));
    {
        let attempts = attempts.clone();
        handler.register_interceptor(request_interceptor(move |_request, _id| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Intercept::Respond(response())) }
        }));
    }

    let h = harness(InMemoryTransport::new().with_route(FIRST_SERVER, handler), config);
    h.client
        .put_item_to_request_to_uri_cache(Some(ADD_CACHE_KEY), "http://10.0.0.1:8181");

    (h, attempts)
}

#[tokio::test]
async fn test_server_error_status_is_retried_then_unprocessed() {
    let (h, attempts) = responding_harness(
        || {
            ResponseBuilder::new(RpcResponseType::Success)
                .with_status(StatusCode::SERVICE_UNAVAILABLE)
                .build()
        },
        fast_config().with_retrying_limit(2),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert_eq!(
        err.message(),
        "Failed RPC call for SimpleCalc::add(). Status code: 503. Reason: Service Unavailable."
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(!h.client.request_to_uri_cache().contains(ADD_CACHE_KEY));
}

#[tokio::test]
async fn test_missing_response_type_is_possibly_processed() {
    let (h, attempts) = responding_harness(|| RpcHttpResponse::new(Bytes::new()), fast_config());

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::PossiblyProcessed);
    assert!(err.message().contains("missing or is not one of these"));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(!h.client.request_to_uri_cache().contains(ADD_CACHE_KEY));
}

#[tokio::test]
async fn test_unrecognized_response_type_is_possibly_processed() {
    let (h, _attempts) = responding_harness(
        || {
            let mut response = RpcHttpResponse::new(Bytes::new());
            response.headers_mut().insert(
                RpcMessageHeader::ResponseType.header_name(),
                http::HeaderValue::from_static("teleport"),
            );
            response
        },
        fast_config(),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::PossiblyProcessed);
    assert!(err.message().contains("missing or is not one of these"));
    assert!(!h.client.request_to_uri_cache().contains(ADD_CACHE_KEY));
}

#[tokio::test]
async fn test_unexpected_success_status_is_possibly_processed() {
    let (h, attempts) = responding_harness(
        || {
            ResponseBuilder::new(RpcResponseType::Success)
                .with_status(StatusCode::NOT_FOUND)
                .with_content("gone")
                .build()
        },
        fast_config(),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::PossiblyProcessed);
    assert!(err.message().contains("unexpected HTTP status code: 404"));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(!h.client.request_to_uri_cache().contains(ADD_CACHE_KEY));
}

#[tokio::test]
async fn test_redirect_without_host_is_unprocessed() {
    let (h, attempts) = responding_harness(
        || ResponseBuilder::new(RpcResponseType::Redirect).build(),
        fast_config(),
    );

    let err = h.client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert!(
        err.message()
            .contains("redirect-to-host-or-ip request header not specified")
    );
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(!h.client.request_to_uri_cache().contains(ADD_CACHE_KEY));
}

/// Answers with Throwable headers and a body that cannot be read.
struct BrokenThrowableBodyTransport;

#[async_trait::async_trait]
impl RpcTransport for BrokenThrowableBodyTransport {
    async fn send(&self, _request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        use http_body_util::{BodyExt, Full, Limited};

        // Reading past the limit fails, like a connection dropped mid-body.
        let body = Limited::new(Full::new(Bytes::from_static(b"Division by zero")), 1).boxed();

        let mut response = TransportResponse::new(body);
        let headers = response.headers_mut();
        headers.set_rpc(RpcMessageHeader::ResponseType, "throwable");
        headers.set_rpc(RpcMessageHeader::ThrowableType, "unprocessed");
        headers.set_rpc(RpcMessageHeader::ThrowableClass, "RuntimeException");
        Ok(response)
    }
}

#[tokio::test]
async fn test_unreadable_throwable_body_falls_back_to_placeholder() {
    let client = RpcClient::new(
        "http://10.0.0.1:8181".parse().unwrap(),
        Arc::new(BrokenThrowableBodyTransport),
        Arc::new(default_dns()),
    );

    let err = client.invoke("SimpleCalc", "add", vec![json!(5), json!(7)]).await.unwrap_err();

    assert_eq!(err.kind(), RpcErrorKind::Unprocessed);
    assert_eq!(err.previous_class(), Some("RuntimeException"));
    assert_eq!(
        err.message(),
        "Throwable class: RuntimeException. Throwable message: Throwable message is empty. "
    );
}
