use example_httprpc_service_definition::{SIMPLE_CALC_INTERFACE, SimpleCalc};
use httprpc::BoxError;
use httprpc::responses::{RedirectRpcResponseFactory, ResponseFactory, RetryRpcResponseFactory};
use httprpc_service::{JsonSerializer, RpcRegistry};
use httprpc_service_caller::RpcProxyFactory;
use httprpc_service_endpoint::{Intercept, RpcRequestHandler, request_interceptor};
use httprpc_tokio_client::RpcClientBuilder;
use httprpc_tokio_server::RpcServerFactory;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const FIRST_SERVER_PORT: u16 = 8181;
const SECOND_SERVER_PORT: u16 = 8182;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = Arc::new(RpcRegistry::new());
    registry.register_remote_object(SIMPLE_CALC_INTERFACE, || SimpleCalc)?;

    let request_handler = Arc::new(RpcRequestHandler::new(Arc::new(JsonSerializer), registry));

    // Answer the very first call with a retry.
    let do_retry = Arc::new(AtomicBool::new(true));
    request_handler.register_interceptor(request_interceptor(move |request, _id| {
        let retry = do_retry.swap(false, Ordering::SeqCst);
        async move {
            if retry {
                println!("Retry");
                return Ok(Intercept::Respond(
                    RetryRpcResponseFactory::new(Some(1000)).get_response(),
                ));
            }
            Ok(Intercept::Continue(request))
        }
    }));

    // Then send it over to the second server, once.
    let do_redirect = Arc::new(AtomicBool::new(true));
    request_handler.register_interceptor(request_interceptor(move |request, _id| {
        let redirect = do_redirect.swap(false, Ordering::SeqCst);
        async move {
            if redirect {
                println!("Redirect");
                return Ok(Intercept::Respond(
                    RedirectRpcResponseFactory::new("localhost")
                        .with_port(SECOND_SERVER_PORT)
                        .with_direct_direction(true)
                        .get_response(),
                ));
            }
            Ok(Intercept::Continue(request))
        }
    }));

    let first_server = RpcServerFactory::new(FIRST_SERVER_PORT, request_handler.clone())
        .get_rpc_server()
        .await?;
    let second_server = RpcServerFactory::new(SECOND_SERVER_PORT, request_handler)
        .get_rpc_server()
        .await?;

    first_server.start()?;
    second_server.start()?;

    let client = Arc::new(
        RpcClientBuilder::new("localhost")
            .with_port(FIRST_SERVER_PORT)
            .build()?,
    );
    let calc = RpcProxyFactory::new().create_proxy(client, SIMPLE_CALC_INTERFACE);

    let sum: i64 = calc.call("add", (5, 7)).await?;
    println!("{} + {} = {}", 5, 7, sum);

    let quotient = match calc.call::<_, f64>("div", (4, 0)).await {
        Ok(quotient) => quotient.to_string(),
        Err(err) => format!("Operation failed. {err}"),
    };
    println!("4 / 0 = {quotient}");

    first_server.stop().await?;
    second_server.stop().await?;

    Ok(())
}
