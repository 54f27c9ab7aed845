pub mod client;
pub mod config;
pub mod http_client;
pub mod responses;
pub mod validators;
