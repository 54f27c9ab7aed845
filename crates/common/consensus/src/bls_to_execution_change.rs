use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use stakenode_bls::{BLSSignature, PublicKey};
use tree_hash_derive::TreeHash;

use crate::misc::checksummed_address;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedBLSToExecutionChange {
    pub message: BLSToExecutionChange,
    pub signature: BLSSignature,
}

/// Moves a validator from 0x00 BLS withdrawal credentials to an execution address.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BLSToExecutionChange {
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    pub from_bls_pubkey: PublicKey,
    #[serde(with = "checksummed_address")]
    pub to_execution_address: Address,
}
