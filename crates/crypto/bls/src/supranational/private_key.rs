use blst::min_pk::SecretKey as BlstSecretKey;

use crate::{
    PrivateKey, PublicKey,
    constants::DST,
    errors::BLSError,
    signature::BLSSignature,
    traits::Signable,
};

impl PrivateKey {
    /// Generates a fresh secret key from 32 bytes of OS randomness (EIP-2333 `KeyGen`).
    pub fn random() -> Result<Self, BLSError> {
        let input_key_material = rand::random::<[u8; 32]>();
        let secret_key = BlstSecretKey::key_gen(&input_key_material, &[])?;
        Ok(Self::from_bytes(&secret_key.to_bytes()))
    }

    pub fn to_blst_secret_key(&self) -> Result<BlstSecretKey, BLSError> {
        BlstSecretKey::from_bytes(self.inner.as_slice()).map_err(|_| BLSError::InvalidPrivateKey)
    }

    pub fn public_key(&self) -> Result<PublicKey, BLSError> {
        PublicKey::try_from(self.to_blst_secret_key()?.sk_to_pk())
    }
}

impl Signable for PrivateKey {
    type Error = BLSError;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error> {
        let signature = self.to_blst_secret_key()?.sign(message, DST, &[]);
        BLSSignature::try_from(signature)
    }
}
