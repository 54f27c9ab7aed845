use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use stakenode_bls::PublicKey;
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,

    /// Commitment to pubkey for withdrawals
    pub withdrawal_credentials: B256,

    /// Balance at stake
    #[serde(with = "serde_utils::quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,

    /// When criteria for activation were met
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    /// When validator can withdraw funds
    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FAR_FUTURE_EPOCH;

    #[test]
    fn deserializes_quoted_epochs() {
        let json = format!(
            r#"{{"pubkey":"0x{}","withdrawal_credentials":"0x{}","effective_balance":"32000000000","slashed":false,"activation_eligibility_epoch":"0","activation_epoch":"10","exit_epoch":"18446744073709551615","withdrawable_epoch":"18446744073709551615"}}"#,
            "00".repeat(48),
            "01".repeat(32)
        );
        let validator: Validator = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(validator.activation_epoch, 10);
        assert_eq!(validator.exit_epoch, FAR_FUTURE_EPOCH);
    }
}
