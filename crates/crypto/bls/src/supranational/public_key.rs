use blst::min_pk::PublicKey as BlstPublicKey;

use crate::{errors::BLSError, public_key::PublicKey};

impl TryFrom<BlstPublicKey> for PublicKey {
    type Error = BLSError;

    fn try_from(value: BlstPublicKey) -> Result<Self, Self::Error> {
        PublicKey::from_bytes(&value.to_bytes()).map_err(|_| BLSError::InvalidPublicKey)
    }
}

impl PublicKey {
    pub fn to_blst_public_key(&self) -> Result<BlstPublicKey, BLSError> {
        BlstPublicKey::from_bytes(self.to_bytes()).map_err(BLSError::from)
    }
}
