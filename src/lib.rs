pub mod cache;
pub mod call;
pub mod constants;
pub mod error;
pub mod message;
pub mod responses;
pub mod utils;

pub use error::{BoxError, HeaderError, RpcError, RpcErrorKind, Throwable};
