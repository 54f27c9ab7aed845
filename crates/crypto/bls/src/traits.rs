use crate::{BLSSignature, PublicKey};

pub trait Signable {
    type Error;

    /// Signs `message` under the beacon chain proof-of-possession ciphersuite.
    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error>;
}

pub trait Verifiable {
    type Error;

    /// Verifies a BLS signature against a public key and message.
    ///
    /// # Arguments
    /// * `public_key` - The public key to verify against
    /// * `message` - The message that was signed
    ///
    /// # Returns
    /// * `Result<bool, BLSError>` - Ok(true) if the signature is valid, Ok(false) if verification
    ///   fails, or Err if there are issues with signature or public key bytes
    fn verify(&self, public_key: &PublicKey, message: &[u8]) -> Result<bool, Self::Error>;
}
