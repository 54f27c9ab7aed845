use blst::BLST_ERROR;
use thiserror::Error;

#[derive(Error, PartialEq, Debug)]
pub enum BLSError {
    #[error("blst error: {0:?}")]
    BlstError(BLST_ERROR),
    #[error("invalid byte length")]
    InvalidByteLength,
    #[error("invalid hex string")]
    InvalidHexString,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid signature")]
    InvalidSignature,
}

impl From<BLST_ERROR> for BLSError {
    fn from(err: BLST_ERROR) -> Self {
        BLSError::BlstError(err)
    }
}
