pub mod attestation;
pub mod block;
pub mod client_type;
pub mod config;
pub mod error;
pub mod head;
pub mod id;
pub mod sync;
pub mod validator;
