use alloy_primitives::B256;

use crate::hmac::hmac_sha_256;

const HASH_LEN: usize = 32;

/// PBKDF2 with HMAC-SHA256 as the pseudo random function (RFC 8018 section 5.2).
pub fn pbkdf2(password: &[u8], salt: &[u8], iterations: u32, derived_key_length: u32) -> Vec<u8> {
    let derived_key_length = derived_key_length as usize;
    let block_count = derived_key_length.div_ceil(HASH_LEN) as u32;

    let mut derived_key = (1..=block_count)
        .flat_map(|block_index| derive_block(password, salt, iterations, block_index))
        .collect::<Vec<_>>();
    derived_key.truncate(derived_key_length);
    derived_key
}

fn derive_block(password: &[u8], salt: &[u8], iterations: u32, block_index: u32) -> B256 {
    let mut mac = hmac_sha_256(password, &[salt, &block_index.to_be_bytes()].concat());
    let mut block = mac;

    for _ in 1..iterations {
        mac = hmac_sha_256(password, mac.as_slice());
        for (block_byte, mac_byte) in block.iter_mut().zip(mac.iter()) {
            *block_byte ^= mac_byte;
        }
    }
    block
}
