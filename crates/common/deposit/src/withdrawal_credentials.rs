use alloy_primitives::{B256, keccak256};
use stakenode_bls::PublicKey;
use stakenode_consensus::constants::BLS_WITHDRAWAL_PREFIX;

const PUBKEY_USED_KEY_PREFIX: &[u8] = b"validator.pubkey.used";

/// Keccak-256 of the withdrawal public key with its first byte replaced by the BLS withdrawal
/// prefix.
pub fn bls_withdrawal_credentials(withdrawal_public_key: &PublicKey) -> B256 {
    let mut withdrawal_credentials = keccak256(withdrawal_public_key.to_bytes());
    withdrawal_credentials[0] = BLS_WITHDRAWAL_PREFIX;
    withdrawal_credentials
}

/// Storage key under which the protocol flags a validator public key as used.
pub fn pubkey_used_key(public_key: &PublicKey) -> B256 {
    keccak256([PUBKEY_USED_KEY_PREFIX, public_key.to_bytes()].concat())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case([0x00; 48])]
    #[case([0xff; 48])]
    #[case([0x5a; 48])]
    fn credentials_carry_bls_prefix(#[case] bytes: [u8; 48]) {
        let public_key = PublicKey::from_bytes(&bytes).expect("valid public key");
        let withdrawal_credentials = bls_withdrawal_credentials(&public_key);

        assert_eq!(withdrawal_credentials[0], BLS_WITHDRAWAL_PREFIX);
        assert_eq!(withdrawal_credentials[1..], keccak256(bytes)[1..]);
    }

    #[test]
    fn used_key_hashes_prefix_and_public_key() {
        let public_key = PublicKey::from_bytes(&[0x01; 48]).expect("valid public key");
        let mut preimage = b"validator.pubkey.used".to_vec();
        preimage.extend_from_slice(&[0x01; 48]);

        assert_eq!(pubkey_used_key(&public_key), keccak256(preimage));
        assert_ne!(
            pubkey_used_key(&public_key),
            pubkey_used_key(&PublicKey::from_bytes(&[0x02; 48]).expect("valid public key"))
        );
    }
}
