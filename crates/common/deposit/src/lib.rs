pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod key_manager;
pub mod result;
pub mod withdrawal_credentials;
