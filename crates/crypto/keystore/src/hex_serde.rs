//! Unprefixed lowercase hex, the encoding EIP-2335 uses for every byte field.

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serializer, de};

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    hex::decode(encoded.trim_start_matches("0x")).map_err(de::Error::custom)
}
