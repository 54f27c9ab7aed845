use std::collections::HashMap;

use alloy_primitives::{Address, B256, aliases::B32};
use async_trait::async_trait;
use stakenode_api_types_beacon::{
    attestation::AttestationInfo,
    block::{BeaconBlock, BeaconBlockHeader},
    client_type::BeaconClientType,
    config::{Eth2Config, Eth2DepositContract},
    head::BeaconHead,
    id::ID,
    sync::SyncStatus,
    validator::{ValidatorStatus, ValidatorStatusOptions},
};
use stakenode_bls::{BLSSignature, PublicKey};
use stakenode_consensus::eth_1_data::Eth1Data;

use crate::{committees::Committees, error::BeaconError};

/// Everything a staking node reads from, or submits to, a beacon node.
///
/// Block lookups return `Ok(None)` when the block does not exist (missed or orphaned slot).
/// Balances are in gwei.
#[async_trait]
pub trait BeaconClient: Send + Sync {
    async fn client_type(&self) -> Result<BeaconClientType, BeaconError>;

    async fn sync_status(&self) -> Result<SyncStatus, BeaconError>;

    async fn eth2_config(&self) -> Result<Eth2Config, BeaconError>;

    async fn eth2_deposit_contract(&self) -> Result<Eth2DepositContract, BeaconError>;

    async fn attestations(
        &self,
        block_id: &ID,
    ) -> Result<Option<Vec<AttestationInfo>>, BeaconError>;

    async fn beacon_block(&self, block_id: &ID) -> Result<Option<BeaconBlock>, BeaconError>;

    async fn beacon_block_header(
        &self,
        block_id: &ID,
    ) -> Result<Option<BeaconBlockHeader>, BeaconError>;

    async fn beacon_head(&self) -> Result<BeaconHead, BeaconError>;

    async fn validator_status_by_index(
        &self,
        index: u64,
        options: ValidatorStatusOptions,
    ) -> Result<ValidatorStatus, BeaconError>;

    async fn validator_status(
        &self,
        public_key: &PublicKey,
        options: ValidatorStatusOptions,
    ) -> Result<ValidatorStatus, BeaconError>;

    /// Every requested key is present in the result; keys unknown to the chain map to
    /// [ValidatorStatus::absent].
    async fn validator_statuses(
        &self,
        public_keys: &[PublicKey],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<PublicKey, ValidatorStatus>, BeaconError>;

    async fn validator_index(&self, public_key: &PublicKey) -> Result<u64, BeaconError>;

    /// Whether each validator sits in the sync committee for `epoch`.
    async fn validator_sync_duties(
        &self,
        indices: &[u64],
        epoch: u64,
    ) -> Result<HashMap<u64, bool>, BeaconError>;

    /// Number of blocks each validator proposes during `epoch`.
    async fn validator_proposer_duties(
        &self,
        indices: &[u64],
        epoch: u64,
    ) -> Result<HashMap<u64, u64>, BeaconError>;

    /// Fails if any batch fails.
    async fn validator_balances(
        &self,
        indices: &[u64],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<u64, u64>, BeaconError>;

    /// Best effort: indices from failed batches are missing from the result and must be treated
    /// as unknown, not as zero.
    async fn validator_balances_safe(
        &self,
        indices: &[u64],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<u64, u64>, BeaconError>;

    async fn domain_data(
        &self,
        domain_type: B32,
        epoch: u64,
        use_genesis_fork: bool,
    ) -> Result<B256, BeaconError>;

    async fn exit_validator(
        &self,
        validator_index: u64,
        epoch: u64,
        signature: BLSSignature,
    ) -> Result<(), BeaconError>;

    async fn eth1_data_for_eth2_block(
        &self,
        block_id: &ID,
    ) -> Result<Option<Eth1Data>, BeaconError>;

    /// Committees of `epoch`, or of the head epoch when `None`.
    async fn committees_for_epoch(
        &self,
        epoch: Option<u64>,
    ) -> Result<Box<dyn Committees>, BeaconError>;

    async fn change_withdrawal_credentials(
        &self,
        validator_index: u64,
        from_bls_public_key: PublicKey,
        to_execution_address: Address,
        signature: BLSSignature,
    ) -> Result<(), BeaconError>;
}
