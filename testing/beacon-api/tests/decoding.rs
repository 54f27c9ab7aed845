use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{address, b256};
use serde::de::DeserializeOwned;
use stakenode_api_types_beacon::{
    sync::SyncStatus,
    validator::{ValidatorData, ValidatorState, ValidatorStatus, ValidatorSuperstatus},
};
use stakenode_beacon_client::{
    committees::{CommitteePool, Committees},
    http::responses::{
        BeaconResponse, DataResponse, HeaderData, SignedBlock, SpecData, SyncingData,
    },
};
use stakenode_consensus::constants::FAR_FUTURE_EPOCH;

const PATH_TO_TEST_DATA_FOLDER: &str = "./tests/assets";

#[test]
fn test_committees_decode_into_pool() -> anyhow::Result<()> {
    let bytes = read_file("committees.json")?;
    let pool = CommitteePool::new();

    let committees = pool.decode_json(&bytes)?;
    assert_eq!(committees.count(), 4);
    assert_eq!(committees.index(1), 1);
    assert_eq!(committees.slot(1), 320);
    assert_eq!(committees.validators(0), &[12, 7, 4031]);
    assert_eq!(committees.validator_count(2), 0);
    assert_eq!(committees.validators(3), &[511, 6, 77, 1_000_000]);

    Box::new(committees).release();
    assert_eq!(pool.idle_buffers(), 1);

    let again = pool.decode_json(&bytes)?;
    assert_eq!(pool.idle_buffers(), 0);
    assert_eq!(again.validators(1), &[98, 3]);

    Ok(())
}

#[test]
fn test_electra_block() -> anyhow::Result<()> {
    let response: BeaconResponse<SignedBlock> = read_json_file("block_electra.json")?;
    let block = response.data.into_beacon_block()?;

    assert_eq!(block.slot, 10432);
    assert_eq!(block.proposer_index, 1211);
    assert!(block.has_execution_payload);
    assert_eq!(block.execution_block_number, 9876);
    assert_eq!(
        block.fee_recipient,
        address!("0x8943545177806ed17b9f23f0a21ee5948ecaa776")
    );
    assert_eq!(block.withdrawals.len(), 2);
    assert_eq!(block.withdrawals[1].validator_index, 98);
    assert_eq!(block.withdrawals[1].amount, 31_000_000_000);

    let [attestation] = block.attestations.as_slice() else {
        panic!("expected one attestation");
    };
    assert_eq!(attestation.slot_index, 10431);
    assert_eq!(attestation.committee_indices(), vec![0, 2]);

    // Committee 0 holds three validators and committee 2 two; bits 1 and 3 are set.
    let committee_sizes = HashMap::from([(0, 3), (2, 2)]);
    assert!(!attestation.validator_attested(0, 0, &committee_sizes)?);
    assert!(attestation.validator_attested(0, 1, &committee_sizes)?);
    assert!(attestation.validator_attested(2, 0, &committee_sizes)?);
    assert!(!attestation.validator_attested(2, 1, &committee_sizes)?);
    assert!(attestation.validator_attested(1, 0, &committee_sizes).is_err());

    Ok(())
}

#[test]
fn test_phase0_block() -> anyhow::Result<()> {
    let response: BeaconResponse<SignedBlock> = read_json_file("block_phase0.json")?;
    assert_eq!(response.data.message.body.eth1_data.deposit_count, 64);

    let block = response.data.into_beacon_block()?;
    assert!(!block.has_execution_payload);
    assert!(block.withdrawals.is_empty());

    let [attestation] = block.attestations.as_slice() else {
        panic!("expected one attestation");
    };
    assert_eq!(attestation.committee_indices(), vec![5]);

    let committee_sizes = HashMap::from([(5, 3)]);
    assert!(attestation.validator_attested(5, 0, &committee_sizes)?);
    assert!(!attestation.validator_attested(5, 1, &committee_sizes)?);
    assert!(attestation.validator_attested(5, 2, &committee_sizes)?);

    Ok(())
}

#[test]
fn test_validators() -> anyhow::Result<()> {
    let response: BeaconResponse<Vec<ValidatorData>> = read_json_file("validators.json")?;
    assert!(response.data.iter().all(ValidatorData::has_exact_state));
    let statuses: Vec<ValidatorStatus> = response
        .data
        .into_iter()
        .map(|data| data.into_status(9000))
        .collect();

    let active = &statuses[0];
    assert!(active.exists);
    assert_eq!(active.index, 12);
    assert_eq!(active.balance, 32_001_234_567);
    assert_eq!(active.status, ValidatorState::ActiveOngoing);
    assert_eq!(active.exit_epoch, FAR_FUTURE_EPOCH);
    assert_eq!(
        active.withdrawal_credentials,
        b256!("0x010000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
    );

    let withdrawn = &statuses[1];
    assert!(withdrawn.slashed);
    assert_eq!(withdrawn.status.superstatus(), ValidatorSuperstatus::Withdrawal);
    assert_eq!(withdrawn.withdrawable_epoch, 8392);

    Ok(())
}

#[test]
fn test_block_header() -> anyhow::Result<()> {
    let response: BeaconResponse<HeaderData> = read_json_file("header.json")?;
    assert!(response.finalized);
    assert!(response.data.canonical);
    assert_eq!(response.data.header.message.slot, 10432);
    assert_eq!(response.data.header.message.proposer_index, 1211);
    Ok(())
}

#[test]
fn test_syncing_and_spec() -> anyhow::Result<()> {
    let syncing: DataResponse<SyncingData> = read_json_file("syncing.json")?;
    let status = SyncStatus::from_head(
        syncing.data.head_slot,
        syncing.data.sync_distance,
        syncing.data.is_syncing,
    );
    assert!(status.syncing);
    assert!((status.progress - 10432.0 / 10496.0).abs() < f64::EPSILON);

    let spec: DataResponse<SpecData> = read_json_file("spec.json")?;
    assert_eq!(spec.data.seconds_per_slot, 12);
    assert_eq!(spec.data.slots_per_epoch, 32);
    assert_eq!(spec.data.epochs_per_sync_committee_period, 256);
    Ok(())
}

pub fn read_file<P: AsRef<Path>>(file_name: P) -> anyhow::Result<Vec<u8>> {
    Ok(fs::read(PathBuf::from(PATH_TO_TEST_DATA_FOLDER).join(file_name))?)
}

pub fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(file_name: P) -> anyhow::Result<T> {
    Ok(serde_json::from_slice(&read_file(file_name)?)?)
}
