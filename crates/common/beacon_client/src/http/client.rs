use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, B256, aliases::B32};
use async_trait::async_trait;
use futures::try_join;
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
use stakenode_consensus::{
    bls_to_execution_change::{BLSToExecutionChange, SignedBLSToExecutionChange},
    eth_1_data::Eth1Data,
    fork::Fork,
    misc::compute_domain,
    voluntary_exit::{SignedVoluntaryExit, VoluntaryExit},
};
use stakenode_network_spec::networks::NetworkSpec;
use tracing::{debug, info};

use super::{
    config::BeaconApiConfig,
    http_client::ClientWithBaseUrl,
    responses::{
        BeaconResponse, DataResponse, DepositContractData, FinalityCheckpoints, GenesisData,
        HeaderData, NodeVersion, ProposerDuty, SignedBlock, SpecData, SyncCommitteeDuty,
        SyncingData,
    },
    validators::{BalancesEndpoint, ValidatorsEndpoint},
};
use crate::{
    balances::BalanceBatcher,
    client::BeaconClient,
    committees::{CommitteePool, Committees},
    duties::{proposal_counts, sync_committee_membership},
    error::BeaconError,
    resolver::ValidatorStatusResolver,
};

/// [BeaconClient] over the standard Beacon API (`/eth/v1`, `/eth/v2`) JSON endpoints.
#[derive(Debug, Clone)]
pub struct BeaconApiClient {
    http_client: ClientWithBaseUrl,
    network_spec: Arc<NetworkSpec>,
    committee_pool: CommitteePool,
    resolver: ValidatorStatusResolver<ValidatorsEndpoint>,
    balances: BalanceBatcher<BalancesEndpoint>,
}

impl BeaconApiClient {
    pub fn new(config: BeaconApiConfig, network_spec: Arc<NetworkSpec>) -> anyhow::Result<Self> {
        let http_client = ClientWithBaseUrl::new(config.endpoint, config.request_timeout)?;
        let batch_size = config.validator_batch_size.max(1);
        Ok(Self {
            resolver: ValidatorStatusResolver::new(
                ValidatorsEndpoint::new(http_client.clone()),
                batch_size,
                network_spec.slots_per_epoch,
            ),
            balances: BalanceBatcher::new(BalancesEndpoint::new(http_client.clone()), batch_size),
            http_client,
            network_spec,
            committee_pool: CommitteePool::new(),
        })
    }

    pub fn committee_pool(&self) -> &CommitteePool {
        &self.committee_pool
    }

    async fn get_syncing(&self) -> Result<SyncingData, BeaconError> {
        let response: DataResponse<SyncingData> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/node/syncing")?)
            .await?;
        Ok(response.data)
    }

    async fn get_genesis(&self) -> Result<GenesisData, BeaconError> {
        let response: DataResponse<GenesisData> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/beacon/genesis")?)
            .await?;
        Ok(response.data)
    }

    async fn get_spec(&self) -> Result<SpecData, BeaconError> {
        let response: DataResponse<SpecData> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/config/spec")?)
            .await?;
        Ok(response.data)
    }

    async fn get_state_fork(&self, state_id: &ID) -> Result<Fork, BeaconError> {
        let response: BeaconResponse<Fork> = self
            .http_client
            .send_json(
                self.http_client
                    .get(&format!("/eth/v1/beacon/states/{state_id}/fork"))?,
            )
            .await?;
        Ok(response.data)
    }

    async fn get_block(&self, block_id: &ID) -> Result<Option<SignedBlock>, BeaconError> {
        let response: Option<BeaconResponse<SignedBlock>> = self
            .http_client
            .send_optional_json(
                self.http_client
                    .get(&format!("/eth/v2/beacon/blocks/{block_id}"))?,
            )
            .await?;
        Ok(response.map(|response| response.data))
    }

    async fn submit<T: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), BeaconError> {
        self.http_client
            .send(self.http_client.post(path)?.json(body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BeaconClient for BeaconApiClient {
    async fn client_type(&self) -> Result<BeaconClientType, BeaconError> {
        let response: DataResponse<NodeVersion> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/node/version")?)
            .await?;
        let client_type = BeaconClientType::from_node_version(&response.data.version);
        debug!(version = %response.data.version, ?client_type, "Detected beacon node");
        Ok(client_type)
    }

    async fn sync_status(&self) -> Result<SyncStatus, BeaconError> {
        let syncing = self.get_syncing().await?;
        Ok(SyncStatus::from_head(
            syncing.head_slot,
            syncing.sync_distance,
            syncing.is_syncing,
        ))
    }

    async fn eth2_config(&self) -> Result<Eth2Config, BeaconError> {
        let (genesis, spec) = try_join!(self.get_genesis(), self.get_spec())?;
        Ok(genesis.into_eth2_config(spec))
    }

    async fn eth2_deposit_contract(&self) -> Result<Eth2DepositContract, BeaconError> {
        let response: DataResponse<DepositContractData> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/config/deposit_contract")?)
            .await?;
        Ok(Eth2DepositContract {
            chain_id: response.data.chain_id,
            address: response.data.address,
        })
    }

    async fn attestations(
        &self,
        block_id: &ID,
    ) -> Result<Option<Vec<AttestationInfo>>, BeaconError> {
        self.get_block(block_id)
            .await?
            .map(SignedBlock::into_attestations)
            .transpose()
    }

    async fn beacon_block(&self, block_id: &ID) -> Result<Option<BeaconBlock>, BeaconError> {
        self.get_block(block_id)
            .await?
            .map(SignedBlock::into_beacon_block)
            .transpose()
    }

    async fn beacon_block_header(
        &self,
        block_id: &ID,
    ) -> Result<Option<BeaconBlockHeader>, BeaconError> {
        let response: Option<BeaconResponse<HeaderData>> = self
            .http_client
            .send_optional_json(
                self.http_client
                    .get(&format!("/eth/v1/beacon/headers/{block_id}"))?,
            )
            .await?;
        Ok(response.map(|response| BeaconBlockHeader {
            slot: response.data.header.message.slot,
            proposer_index: response.data.header.message.proposer_index,
        }))
    }

    async fn beacon_head(&self) -> Result<BeaconHead, BeaconError> {
        let checkpoints_request = async {
            let response: BeaconResponse<FinalityCheckpoints> = self
                .http_client
                .send_json(
                    self.http_client
                        .get("/eth/v1/beacon/states/head/finality_checkpoints")?,
                )
                .await?;
            Ok::<_, BeaconError>(response.data)
        };
        let (syncing, checkpoints) = try_join!(self.get_syncing(), checkpoints_request)?;
        Ok(BeaconHead {
            epoch: self.network_spec.epoch_at_slot(syncing.head_slot),
            finalized_epoch: checkpoints.finalized.epoch,
            justified_epoch: checkpoints.current_justified.epoch,
            previous_justified_epoch: checkpoints.previous_justified.epoch,
        })
    }

    async fn validator_status_by_index(
        &self,
        index: u64,
        options: ValidatorStatusOptions,
    ) -> Result<ValidatorStatus, BeaconError> {
        Ok(self
            .resolver
            .statuses_by_index(&[index], options)
            .await?
            .remove(&index)
            .unwrap_or_else(ValidatorStatus::absent))
    }

    async fn validator_status(
        &self,
        public_key: &PublicKey,
        options: ValidatorStatusOptions,
    ) -> Result<ValidatorStatus, BeaconError> {
        Ok(self
            .resolver
            .statuses_by_public_key(std::slice::from_ref(public_key), options)
            .await?
            .remove(public_key)
            .unwrap_or_else(ValidatorStatus::absent))
    }

    async fn validator_statuses(
        &self,
        public_keys: &[PublicKey],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<PublicKey, ValidatorStatus>, BeaconError> {
        self.resolver
            .statuses_by_public_key(public_keys, options)
            .await
    }

    async fn validator_index(&self, public_key: &PublicKey) -> Result<u64, BeaconError> {
        let status = self
            .validator_status(public_key, ValidatorStatusOptions::default())
            .await?;
        if !status.exists {
            return Err(BeaconError::ValidatorNotFound(public_key.clone()));
        }
        Ok(status.index)
    }

    async fn validator_sync_duties(
        &self,
        indices: &[u64],
        epoch: u64,
    ) -> Result<HashMap<u64, bool>, BeaconError> {
        let ids = indices.iter().map(u64::to_string).collect::<Vec<_>>();
        let response: BeaconResponse<Vec<SyncCommitteeDuty>> = self
            .http_client
            .send_json(
                self.http_client
                    .post(&format!("/eth/v1/validator/duties/sync/{epoch}"))?
                    .json(&ids),
            )
            .await?;
        Ok(sync_committee_membership(
            indices,
            response.data.iter().map(|duty| duty.validator_index),
        ))
    }

    async fn validator_proposer_duties(
        &self,
        indices: &[u64],
        epoch: u64,
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        let response: BeaconResponse<Vec<ProposerDuty>> = self
            .http_client
            .send_json(
                self.http_client
                    .get(&format!("/eth/v1/validator/duties/proposer/{epoch}"))?,
            )
            .await?;
        Ok(proposal_counts(
            indices,
            response.data.iter().map(|duty| duty.validator_index),
        ))
    }

    async fn validator_balances(
        &self,
        indices: &[u64],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        let state_id = options.state_id(self.network_spec.slots_per_epoch);
        self.balances.balances(&state_id, indices).await
    }

    async fn validator_balances_safe(
        &self,
        indices: &[u64],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        let state_id = options.state_id(self.network_spec.slots_per_epoch);
        Ok(self.balances.balances_safe(&state_id, indices).await)
    }

    async fn domain_data(
        &self,
        domain_type: B32,
        epoch: u64,
        use_genesis_fork: bool,
    ) -> Result<B256, BeaconError> {
        let genesis = self.get_genesis().await?;
        let fork_version = if use_genesis_fork {
            genesis.genesis_fork_version
        } else {
            self.get_state_fork(&ID::Head).await?.version_at(epoch)
        };
        Ok(compute_domain(
            domain_type,
            Some(fork_version),
            Some(genesis.genesis_validators_root),
        ))
    }

    async fn exit_validator(
        &self,
        validator_index: u64,
        epoch: u64,
        signature: BLSSignature,
    ) -> Result<(), BeaconError> {
        self.submit(
            "/eth/v1/beacon/pool/voluntary_exits",
            &SignedVoluntaryExit {
                message: VoluntaryExit {
                    epoch,
                    validator_index,
                },
                signature,
            },
        )
        .await?;
        info!(validator_index, epoch, "Submitted voluntary exit");
        Ok(())
    }

    async fn eth1_data_for_eth2_block(
        &self,
        block_id: &ID,
    ) -> Result<Option<Eth1Data>, BeaconError> {
        Ok(self
            .get_block(block_id)
            .await?
            .map(|block| block.message.body.eth1_data))
    }

    async fn committees_for_epoch(
        &self,
        epoch: Option<u64>,
    ) -> Result<Box<dyn Committees>, BeaconError> {
        let path = match epoch {
            Some(epoch) => format!(
                "/eth/v1/beacon/states/{}/committees?epoch={epoch}",
                ID::Slot(self.network_spec.start_slot_at_epoch(epoch))
            ),
            None => "/eth/v1/beacon/states/head/committees".to_string(),
        };
        let body = self
            .http_client
            .send(self.http_client.get(&path)?)
            .await?
            .bytes()
            .await?;
        let committees = self.committee_pool.decode_json(&body)?;
        debug!(?epoch, committees = committees.count(), "Fetched committees");
        Ok(Box::new(committees))
    }

    async fn change_withdrawal_credentials(
        &self,
        validator_index: u64,
        from_bls_public_key: PublicKey,
        to_execution_address: Address,
        signature: BLSSignature,
    ) -> Result<(), BeaconError> {
        self.submit(
            "/eth/v1/beacon/pool/bls_to_execution_changes",
            &[SignedBLSToExecutionChange {
                message: BLSToExecutionChange {
                    validator_index,
                    from_bls_pubkey: from_bls_public_key,
                    to_execution_address,
                },
                signature,
            }],
        )
        .await?;
        info!(
            validator_index,
            %to_execution_address,
            "Submitted withdrawal credential change"
        );
        Ok(())
    }
}
