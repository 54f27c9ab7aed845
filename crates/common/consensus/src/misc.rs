use alloy_primitives::{B256, aliases::B32};
use ssz_types::{BitVector, typenum::U64};
use tree_hash::TreeHash;

use crate::{
    constants::GENESIS_FORK_VERSION,
    fork_data::ForkData,
    signing_data::SigningData,
};

pub mod checksummed_address {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&address.to_checksum(None))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse::<Address>().map_err(D::Error::custom)
    }
}

pub fn compute_signing_root<SSZObject: TreeHash>(ssz_object: SSZObject, domain: B256) -> B256 {
    SigningData {
        object_root: ssz_object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}

/// Return the epoch number at ``slot``.
pub fn compute_epoch_at_slot(slot: u64, slots_per_epoch: u64) -> u64 {
    slot / slots_per_epoch
}

/// Return the start slot of ``epoch``.
pub fn compute_start_slot_at_epoch(epoch: u64, slots_per_epoch: u64) -> u64 {
    epoch.saturating_mul(slots_per_epoch)
}

/// Return the domain for the ``domain_type`` and ``fork_version``
pub fn compute_domain(
    domain_type: B32,
    fork_version: Option<B32>,
    genesis_validators_root: Option<B256>,
) -> B256 {
    let fork_data = ForkData {
        current_version: fork_version.unwrap_or(GENESIS_FORK_VERSION),
        genesis_validators_root: genesis_validators_root.unwrap_or_default(),
    };
    let fork_data_root = fork_data.compute_fork_data_root();
    let domain_bytes = [&domain_type.0, &fork_data_root.0[..28]].concat();
    B256::from_slice(&domain_bytes)
}

/// Indices of the set bits in an Electra ``committee_bits`` vector, ascending.
pub fn get_committee_indices(committee_bits: &BitVector<U64>) -> Vec<u64> {
    committee_bits
        .iter()
        .enumerate()
        .filter_map(|(i, bit)| bit.then_some(i as u64))
        .collect()
}
