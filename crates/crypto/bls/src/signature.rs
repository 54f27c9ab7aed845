use std::str::FromStr;

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U96};
use tree_hash_derive::TreeHash;

use crate::{constants::SIGNATURE_BYTES_LEN, errors::BLSError};

#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct BLSSignature {
    pub inner: FixedVector<u8, U96>,
}

impl BLSSignature {
    /// The all-zero placeholder carried by a record that has not been signed yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn to_bytes(&self) -> &[u8] {
        self.inner.iter().as_slice()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BLSError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(BLSError::InvalidByteLength);
        }

        Ok(Self {
            inner: FixedVector::new(bytes.to_vec()).map_err(|_| BLSError::InvalidByteLength)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.inner.iter().all(|byte| *byte == 0)
    }
}

impl Serialize for BLSSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for BLSSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        BLSSignature::from_str(&result).map_err(serde::de::Error::custom)
    }
}

impl FromStr for BLSSignature {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;
        BLSSignature::from_bytes(&bytes)
    }
}
