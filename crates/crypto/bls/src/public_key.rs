use std::{fmt, str::FromStr};

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U48};
use tree_hash_derive::TreeHash;

use crate::{constants::PUBLIC_KEY_BYTES_LEN, errors::BLSError};

#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct PublicKey {
    pub inner: FixedVector<u8, U48>,
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        PublicKey::from_str(&result).map_err(serde::de::Error::custom)
    }
}

impl PublicKey {
    pub fn to_bytes(&self) -> &[u8] {
        self.inner.iter().as_slice()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BLSError> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(BLSError::InvalidByteLength);
        }

        Ok(PublicKey {
            inner: FixedVector::new(bytes.to_vec()).map_err(|_| BLSError::InvalidByteLength)?,
        })
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for PublicKey {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;
        PublicKey::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY_HEX: &str = "0xb69dfa082ca75d4e50ed4da8fa07d550ba9ec4019815409f42a98b79861d7ad96633a2476594b94c8a6e3048e1b2623e";

    #[test]
    fn parses_and_displays_prefixed_hex() {
        let public_key = PublicKey::from_str(PUBLIC_KEY_HEX).expect("valid public key");
        assert_eq!(public_key.to_bytes().len(), 48);
        assert_eq!(public_key.to_string(), PUBLIC_KEY_HEX);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            PublicKey::from_str("0x1234"),
            Err(BLSError::InvalidByteLength)
        );
        assert_eq!(
            PublicKey::from_str("0xzz"),
            Err(BLSError::InvalidHexString)
        );
    }

    #[test]
    fn json_is_quoted_hex() {
        let public_key = PublicKey::from_str(PUBLIC_KEY_HEX).expect("valid public key");
        let json = serde_json::to_string(&public_key).expect("serialize");
        assert_eq!(json, format!("\"{PUBLIC_KEY_HEX}\""));
        let decoded: PublicKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, public_key);
    }
}
