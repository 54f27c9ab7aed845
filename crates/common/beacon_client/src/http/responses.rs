use alloy_primitives::{Address, B256, aliases::B32};
use serde::{Deserialize, Serialize};
use ssz_types::{BitVector, typenum::U64};
use stakenode_api_types_beacon::{
    attestation::{AggregationBits, AttestationInfo},
    block::{BeaconBlock, WithdrawalInfo},
    config::Eth2Config,
    id::ValidatorID,
};
use stakenode_bls::{BLSSignature, PublicKey};
use stakenode_consensus::{
    beacon_block_header::SignedBeaconBlockHeader, constants::MAX_COMMITTEES_PER_SLOT,
    eth_1_data::Eth1Data, withdrawal::Withdrawal,
};

use crate::error::BeaconError;

/// A DataResponse data struct that can be used to wrap data type
/// used for json rpc responses
///
/// # Example
/// {
///  "data": json!(T)
/// }
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Beacon API envelope carrying optimistic/finalized flags next to `data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BeaconResponse<T> {
    #[serde(default)]
    pub execution_optimistic: bool,
    #[serde(default)]
    pub finalized: bool,
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeVersion {
    pub version: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SyncingData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub head_slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub sync_distance: u64,
    pub is_syncing: bool,
    #[serde(default)]
    pub is_optimistic: bool,
    #[serde(default)]
    pub el_offline: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GenesisData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub genesis_time: u64,
    pub genesis_validators_root: B256,
    pub genesis_fork_version: B32,
}

/// The subset of `/eth/v1/config/spec` this client uses; other keys are ignored.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SpecData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub seconds_per_slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slots_per_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub epochs_per_sync_committee_period: u64,
}

impl GenesisData {
    pub fn into_eth2_config(self, spec: SpecData) -> Eth2Config {
        Eth2Config {
            genesis_fork_version: self.genesis_fork_version,
            genesis_validators_root: self.genesis_validators_root,
            genesis_epoch: 0,
            genesis_time: self.genesis_time,
            seconds_per_slot: spec.seconds_per_slot,
            slots_per_epoch: spec.slots_per_epoch,
            seconds_per_epoch: spec.seconds_per_slot.saturating_mul(spec.slots_per_epoch),
            epochs_per_sync_committee_period: spec.epochs_per_sync_committee_period,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DepositContractData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub chain_id: u64,
    pub address: Address,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Checkpoint {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    pub root: B256,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FinalityCheckpoints {
    pub previous_justified: Checkpoint,
    pub current_justified: Checkpoint,
    pub finalized: Checkpoint,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BalanceData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub balance: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProposerDuty {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SyncCommitteeDuty {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    #[serde(with = "serde_utils::quoted_u64_vec")]
    pub validator_sync_committee_indices: Vec<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HeaderData {
    pub root: B256,
    pub canonical: bool,
    pub header: SignedBeaconBlockHeader,
}

#[derive(Debug, Serialize)]
pub struct ValidatorsPostRequest<'a> {
    pub ids: &'a [ValidatorID],
}

/// The fields of a `/eth/v2/beacon/blocks/{block_id}` response this client reads. Works for
/// every fork from phase0 onwards; fork-specific fields are optional.
#[derive(Debug, Deserialize)]
pub struct SignedBlock {
    pub message: BlockMessage,
    pub signature: BLSSignature,
}

#[derive(Debug, Deserialize)]
pub struct BlockMessage {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub body: BlockBody,
}

#[derive(Debug, Deserialize)]
pub struct BlockBody {
    pub eth1_data: Eth1Data,
    #[serde(default)]
    pub attestations: Vec<Attestation>,
    #[serde(default)]
    pub execution_payload: Option<ExecutionPayloadSummary>,
}

#[derive(Debug, Deserialize)]
pub struct Attestation {
    pub aggregation_bits: AggregationBits,
    pub data: AttestationData,
    /// Present from Electra on.
    #[serde(default)]
    pub committee_bits: Option<BitVector<U64>>,
}

#[derive(Debug, Deserialize)]
pub struct AttestationData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExecutionPayloadSummary {
    pub fee_recipient: Address,
    #[serde(with = "serde_utils::quoted_u64")]
    pub block_number: u64,
    /// Present from Capella on.
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

impl Attestation {
    /// Pre-Electra attestations cover the single committee named by `data.index`.
    pub fn into_info(self) -> Result<AttestationInfo, BeaconError> {
        let committee_bits = match self.committee_bits {
            Some(committee_bits) => committee_bits,
            None => {
                let mut committee_bits = BitVector::<U64>::new();
                committee_bits
                    .set(self.data.index as usize, true)
                    .map_err(|_| {
                        BeaconError::InvalidResponse(format!(
                            "Committee index {} exceeds {MAX_COMMITTEES_PER_SLOT}",
                            self.data.index
                        ))
                    })?;
                committee_bits
            }
        };
        Ok(AttestationInfo {
            aggregation_bits: self.aggregation_bits,
            slot_index: self.data.slot,
            committee_bits,
        })
    }
}

impl SignedBlock {
    pub fn into_attestations(self) -> Result<Vec<AttestationInfo>, BeaconError> {
        self.message
            .body
            .attestations
            .into_iter()
            .map(Attestation::into_info)
            .collect()
    }

    pub fn into_beacon_block(self) -> Result<BeaconBlock, BeaconError> {
        let BlockMessage {
            slot,
            proposer_index,
            body,
            ..
        } = self.message;
        let attestations = body
            .attestations
            .into_iter()
            .map(Attestation::into_info)
            .collect::<Result<Vec<_>, _>>()?;
        let (has_execution_payload, fee_recipient, execution_block_number, withdrawals) =
            match body.execution_payload {
                Some(payload) => (
                    true,
                    payload.fee_recipient,
                    payload.block_number,
                    payload
                        .withdrawals
                        .into_iter()
                        .map(|withdrawal| WithdrawalInfo {
                            validator_index: withdrawal.validator_index,
                            address: withdrawal.address,
                            amount: withdrawal.amount,
                        })
                        .collect(),
                ),
                None => (false, Address::ZERO, 0, vec![]),
            };
        Ok(BeaconBlock {
            slot,
            proposer_index,
            has_execution_payload,
            attestations,
            fee_recipient,
            execution_block_number,
            withdrawals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis() -> GenesisData {
        GenesisData {
            genesis_time: 1_606_824_023,
            genesis_validators_root: B256::repeat_byte(0x4b),
            genesis_fork_version: B32::ZERO,
        }
    }

    #[test]
    fn eth2_config_combines_genesis_and_spec() {
        let config = genesis().into_eth2_config(SpecData {
            seconds_per_slot: 12,
            slots_per_epoch: 32,
            epochs_per_sync_committee_period: 256,
        });
        assert_eq!(config.genesis_time, 1_606_824_023);
        assert_eq!(config.genesis_epoch, 0);
        assert_eq!(config.seconds_per_epoch, 384);
        assert_eq!(config.epochs_per_sync_committee_period, 256);
    }

    #[test]
    fn eth2_config_saturates_oversized_epoch_length() {
        let config = genesis().into_eth2_config(SpecData {
            seconds_per_slot: u64::MAX,
            slots_per_epoch: 32,
            epochs_per_sync_committee_period: 256,
        });
        assert_eq!(config.seconds_per_epoch, u64::MAX);
    }

    fn aggregation_bits() -> AggregationBits {
        AggregationBits::with_capacity(4).expect("length in range")
    }

    #[test]
    fn pre_electra_attestation_names_its_committee() {
        let attestation = Attestation {
            aggregation_bits: aggregation_bits(),
            data: AttestationData {
                slot: 99,
                index: 7,
            },
            committee_bits: None,
        };
        let info = attestation.into_info().expect("convert");
        assert_eq!(info.committee_indices(), vec![7]);
        assert_eq!(info.slot_index, 99);
    }

    #[test]
    fn out_of_range_committee_index_is_rejected() {
        let attestation = Attestation {
            aggregation_bits: aggregation_bits(),
            data: AttestationData {
                slot: 99,
                index: 64,
            },
            committee_bits: None,
        };
        assert!(matches!(
            attestation.into_info(),
            Err(BeaconError::InvalidResponse(_))
        ));
    }

    #[test]
    fn spec_ignores_unknown_keys() {
        let spec: DataResponse<SpecData> = serde_json::from_str(
            r#"{"data":{"CONFIG_NAME":"mainnet","SECONDS_PER_SLOT":"12","SLOTS_PER_EPOCH":"32","EPOCHS_PER_SYNC_COMMITTEE_PERIOD":"256","MAX_COMMITTEES_PER_SLOT":"64"}}"#,
        )
        .expect("decode");
        assert_eq!(spec.data.slots_per_epoch, 32);
        assert_eq!(spec.data.epochs_per_sync_committee_period, 256);
    }
}
