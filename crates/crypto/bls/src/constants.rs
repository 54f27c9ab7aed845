/// Domain separation tag for the proof-of-possession ciphersuite used by the beacon chain.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SIGNATURE_BYTES_LEN: usize = 96;
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;
