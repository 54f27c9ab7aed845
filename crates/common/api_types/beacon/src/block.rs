use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::attestation::AttestationInfo;

/// A withdrawal swept from the consensus layer to an execution address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalInfo {
    pub validator_index: u64,
    pub address: Address,
    /// Amount in gwei.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconBlock {
    pub slot: u64,
    pub proposer_index: u64,
    pub has_execution_payload: bool,
    pub attestations: Vec<AttestationInfo>,
    pub fee_recipient: Address,
    pub execution_block_number: u64,
    pub withdrawals: Vec<WithdrawalInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
}
