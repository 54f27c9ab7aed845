use alloy_primitives::{B256, aliases::B32};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use stakenode_bls::{BLSSignature, PublicKey};
use tree_hash_derive::TreeHash;

use crate::{
    constants::DOMAIN_DEPOSIT,
    deposit_message::DepositMessage,
    misc::{compute_domain, compute_signing_root},
};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct DepositData {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    pub withdrawal_credentials: B256,
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    pub signature: BLSSignature,
}

impl DepositData {
    /// An unsigned record; the signature stays empty until [DepositData::signing_root] is signed.
    pub fn new(public_key: PublicKey, withdrawal_credentials: B256, amount: u64) -> Self {
        Self {
            public_key,
            withdrawal_credentials,
            amount,
            signature: BLSSignature::empty(),
        }
    }

    pub fn to_deposit_message(&self) -> DepositMessage {
        DepositMessage {
            public_key: self.public_key.clone(),
            withdrawal_credentials: self.withdrawal_credentials,
            amount: self.amount,
        }
    }

    /// Deposits are signed over the hash tree root of their [DepositMessage] mixed with the
    /// deposit domain. The domain is always computed against the genesis fork version and a zero
    /// genesis validators root so deposits stay valid across forks.
    pub fn signing_root(&self, genesis_fork_version: B32) -> B256 {
        compute_signing_root(
            self.to_deposit_message(),
            compute_domain(DOMAIN_DEPOSIT, Some(genesis_fork_version), None),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::fixed_bytes;
    use tree_hash::TreeHash;

    use super::*;
    use crate::constants::FULL_DEPOSIT_AMOUNT;

    fn deposit_data() -> DepositData {
        DepositData::new(
            PublicKey::from_bytes(&[0xab; 48]).expect("valid public key"),
            B256::repeat_byte(0x01),
            FULL_DEPOSIT_AMOUNT,
        )
    }

    #[test]
    fn new_record_is_unsigned() {
        let deposit_data = deposit_data();
        assert!(deposit_data.signature.is_empty());
        assert_eq!(deposit_data.amount, FULL_DEPOSIT_AMOUNT);
    }

    #[test]
    fn signing_root_ignores_signature() {
        let unsigned = deposit_data();
        let mut signed = unsigned.clone();
        signed.signature = BLSSignature::from_bytes(&[0xb1; 96]).expect("valid signature");

        assert_ne!(unsigned.tree_hash_root(), signed.tree_hash_root());
        assert_eq!(
            unsigned.signing_root(fixed_bytes!("0x00000000")),
            signed.signing_root(fixed_bytes!("0x00000000"))
        );
    }

    #[test]
    fn signing_root_depends_on_fork_version() {
        let deposit_data = deposit_data();
        assert_ne!(
            deposit_data.signing_root(fixed_bytes!("0x00000000")),
            deposit_data.signing_root(fixed_bytes!("0x01017000"))
        );
    }
}
