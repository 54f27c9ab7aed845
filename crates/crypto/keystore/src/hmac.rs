use alloy_primitives::B256;
use sha2::{Digest, Sha256, digest::crypto_common::BlockSizeUser};

const INNER_PAD: u8 = 0x36;
const OUTER_PAD: u8 = 0x5c;

/// HMAC-SHA256 as defined in RFC 2104.
pub fn hmac_sha_256(key: &[u8], message: &[u8]) -> B256 {
    let block_key = block_sized_key(key);

    let inner_hash = Sha256::new()
        .chain_update(block_key.iter().map(|byte| byte ^ INNER_PAD).collect::<Vec<_>>())
        .chain_update(message)
        .finalize();

    let outer_hash = Sha256::new()
        .chain_update(block_key.iter().map(|byte| byte ^ OUTER_PAD).collect::<Vec<_>>())
        .chain_update(inner_hash)
        .finalize();

    B256::from_slice(&outer_hash)
}

/// Keys longer than the SHA-256 block are hashed first; shorter keys are zero padded.
fn block_sized_key(key: &[u8]) -> Vec<u8> {
    let block_size = Sha256::block_size();
    let mut block_key = if key.len() > block_size {
        Sha256::digest(key).to_vec()
    } else {
        key.to_vec()
    };
    block_key.resize(block_size, 0);
    block_key
}
