use std::fmt;

use alloy_primitives::B256;

/// A BLS12-381 secret scalar in its 32 byte big-endian encoding.
#[derive(PartialEq, Eq, Clone)]
pub struct PrivateKey {
    pub inner: B256,
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: B256::from_slice(bytes),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        self.inner.as_slice()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}
