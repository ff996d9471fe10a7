use httprpc::message::{RpcHeaderMapExt, RpcMessageHeader, RpcResponseType, RpcThrowableType};
use httprpc::responses::{
    HealthCheckRpcResponseFactory, RedirectRpcResponseFactory, ResponseFactory,
    RetryRpcResponseFactory, SuccessRpcResponseFactory, ThrowableRpcResponseFactory,
};
use httprpc::{RpcError, Throwable};
use http::StatusCode;

fn response_type(response: &httprpc::responses::RpcHttpResponse) -> Option<RpcResponseType> {
    response
        .headers()
        .get_rpc(RpcMessageHeader::ResponseType)
        .and_then(|value| value.parse().ok())
}

#[test]
fn test_success_response_carries_serialized_result() {
    let response = SuccessRpcResponseFactory::new("12").get_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_type(&response), Some(RpcResponseType::Success));
    assert_eq!(
        response.headers().get_rpc(RpcMessageHeader::WithSerializedContent),
        Some("true")
    );
    assert_eq!(response.body().as_ref(), b"12");
    // response type, serialized-content flag, content-length
    assert_eq!(response.headers().len(), 3);
}

#[test]
fn test_health_check_response_is_empty_success() {
    let response = HealthCheckRpcResponseFactory.get_response();

    assert_eq!(response_type(&response), Some(RpcResponseType::Success));
    assert!(response.body().is_empty());
    assert_eq!(response.headers().len(), 2);
}

#[test]
fn test_retry_response_with_and_without_delay() {
    let with_delay = RetryRpcResponseFactory::new(Some(1000)).get_response();
    assert_eq!(response_type(&with_delay), Some(RpcResponseType::Retry));
    assert_eq!(
        with_delay.headers().get_rpc(RpcMessageHeader::RetryWithDelay),
        Some("1000")
    );

    let without_delay = RetryRpcResponseFactory::default().get_response();
    assert!(!without_delay.headers().contains_rpc(RpcMessageHeader::RetryWithDelay));
    assert_eq!(without_delay.headers().len(), 2);
}

#[test]
fn test_redirect_response_with_direct_direction() {
    let response = RedirectRpcResponseFactory::new("127.0.0.1")
        .with_path("/calc")
        .with_port(8182)
        .with_direct_direction(true)
        .get_response();

    let headers = response.headers();
    assert_eq!(response_type(&response), Some(RpcResponseType::Redirect));
    assert_eq!(headers.get_rpc(RpcMessageHeader::RedirectToHostOrIp), Some("127.0.0.1"));
    assert_eq!(headers.get_rpc(RpcMessageHeader::RedirectToPath), Some("/calc"));
    assert_eq!(headers.get_rpc(RpcMessageHeader::RedirectToPort), Some("8182"));
    assert_eq!(headers.get_rpc(RpcMessageHeader::DirectDirection), Some("true"));
    assert_eq!(headers.len(), 6);
}

#[test]
fn test_redirect_response_without_direct_direction() {
    let response = RedirectRpcResponseFactory::new("127.0.0.1")
        .with_path("/calc")
        .with_port(8182)
        .get_response();

    assert!(!response.headers().contains_rpc(RpcMessageHeader::DirectDirection));
    assert_eq!(response.headers().len(), 5);
}

#[test]
fn test_throwable_response_describes_the_failure() {
    let error = RpcError::possibly_processed("Division by zero").with_code(7);
    let response =
        ThrowableRpcResponseFactory::new(&error, RpcThrowableType::PossiblyProcessed).get_response();

    let headers = response.headers();
    assert_eq!(response_type(&response), Some(RpcResponseType::Throwable));
    assert_eq!(
        headers.get_rpc(RpcMessageHeader::ThrowableType),
        Some("possiblyProcessed")
    );
    assert_eq!(headers.get_rpc(RpcMessageHeader::ThrowableCode), Some("7"));
    assert_eq!(
        headers.get_rpc(RpcMessageHeader::ThrowableClass),
        Some(error.class_name())
    );
    assert_eq!(response.body().as_ref(), b"Division by zero");
}
