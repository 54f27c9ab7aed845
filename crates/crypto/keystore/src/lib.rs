pub mod cipher;
pub mod hex_serde;
pub mod hmac;
pub mod keystore;
pub mod pbkdf2;
