pub mod balances;
pub mod client;
pub mod committees;
pub mod duties;
pub mod error;
pub mod http;
pub mod resolver;
