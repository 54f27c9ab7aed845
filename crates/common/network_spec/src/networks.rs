use std::sync::{Arc, LazyLock};

use alloy_primitives::{Address, B256, address, aliases::B32, b256, fixed_bytes};
use serde::{Deserialize, Serialize};
use stakenode_consensus::constants::{SECONDS_PER_SLOT, SLOTS_PER_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Holesky,
    Hoodi,
    Dev,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Holesky => 17000,
            Network::Hoodi => 560048,
            Network::Dev => 1,
        }
    }
}

/// Protocol parameters a staking node needs to talk to one beacon network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub network: Network,
    pub chain_id: u64,
    #[serde(with = "crate::b32_hex")]
    pub genesis_fork_version: B32,
    pub genesis_validators_root: B256,
    pub deposit_contract_address: Address,
    pub slots_per_epoch: u64,
    pub seconds_per_slot: u64,
}

impl NetworkSpec {
    pub fn epoch_at_slot(&self, slot: u64) -> u64 {
        stakenode_consensus::misc::compute_epoch_at_slot(slot, self.slots_per_epoch)
    }

    pub fn start_slot_at_epoch(&self, epoch: u64) -> u64 {
        stakenode_consensus::misc::compute_start_slot_at_epoch(epoch, self.slots_per_epoch)
    }
}

pub static MAINNET: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Mainnet,
        chain_id: Network::Mainnet.chain_id(),
        genesis_fork_version: fixed_bytes!("0x00000000"),
        genesis_validators_root: b256!(
            "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95"
        ),
        deposit_contract_address: address!("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
        slots_per_epoch: SLOTS_PER_EPOCH,
        seconds_per_slot: SECONDS_PER_SLOT,
    }
    .into()
});

pub static HOLESKY: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Holesky,
        chain_id: Network::Holesky.chain_id(),
        genesis_fork_version: fixed_bytes!("0x01017000"),
        genesis_validators_root: b256!(
            "0x9143aa7c615a7f7115e2b6aac319c03529df8242ae705fba9df39b79c59fa8b1"
        ),
        deposit_contract_address: address!("0x4242424242424242424242424242424242424242"),
        slots_per_epoch: SLOTS_PER_EPOCH,
        seconds_per_slot: SECONDS_PER_SLOT,
    }
    .into()
});

pub static HOODI: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Hoodi,
        chain_id: Network::Hoodi.chain_id(),
        genesis_fork_version: fixed_bytes!("0x10000910"),
        genesis_validators_root: b256!(
            "0x212f13fc4df078b6cb7db228f1c8307566dcecf900867401a92023d7ba99cb5f"
        ),
        deposit_contract_address: address!("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
        slots_per_epoch: SLOTS_PER_EPOCH,
        seconds_per_slot: SECONDS_PER_SLOT,
    }
    .into()
});

pub static DEV: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Dev,
        chain_id: Network::Dev.chain_id(),
        genesis_fork_version: fixed_bytes!("0x00000000"),
        genesis_validators_root: B256::ZERO,
        deposit_contract_address: address!("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
        slots_per_epoch: SLOTS_PER_EPOCH,
        seconds_per_slot: SECONDS_PER_SLOT,
    }
    .into()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_epoch_helpers_use_network_epoch_length() {
        let mut spec = (*DEV.clone()).clone();
        spec.slots_per_epoch = 8;
        assert_eq!(spec.epoch_at_slot(17), 2);
        assert_eq!(spec.start_slot_at_epoch(2), 16);
        assert_eq!(spec.start_slot_at_epoch(u64::MAX), u64::MAX);
        assert_eq!(MAINNET.epoch_at_slot(64), 2);
    }
}
