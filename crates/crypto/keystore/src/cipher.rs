use aes::{
    Aes128,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};

/// AES-128 in counter mode. Encryption and decryption are the same operation.
pub fn aes128_ctr(buffer: &mut [u8], key: [u8; 16], initial_vector: &[u8; 16]) {
    let cipher = Aes128::new(&key.into());
    let mut counter = u128::from_be_bytes(*initial_vector);

    for chunk in buffer.chunks_mut(16) {
        let mut block = GenericArray::from(counter.to_be_bytes());
        cipher.encrypt_block(&mut block);
        for (chunk_byte, block_byte) in chunk.iter_mut().zip(block.iter()) {
            *chunk_byte ^= block_byte;
        }
        counter = counter.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_twice_restores_plaintext() {
        let key = [7u8; 16];
        let initial_vector = [9u8; 16];
        let plaintext = b"thirty-two bytes of secret data!".to_vec();

        let mut buffer = plaintext.clone();
        aes128_ctr(&mut buffer, key, &initial_vector);
        assert_ne!(buffer, plaintext);
        aes128_ctr(&mut buffer, key, &initial_vector);
        assert_eq!(buffer, plaintext);
    }
}
