mod interceptor;
pub use interceptor::*;

mod request_handler;
pub use request_handler::*;
