mod client_repository;
pub use client_repository::*;

mod object_sender;
pub use object_sender::*;

mod simple_calc;
pub use simple_calc::*;
