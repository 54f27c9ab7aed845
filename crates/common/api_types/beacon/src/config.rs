use alloy_primitives::{Address, B256, aliases::B32};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eth2Config {
    pub genesis_fork_version: B32,
    pub genesis_validators_root: B256,
    pub genesis_epoch: u64,
    pub genesis_time: u64,
    pub seconds_per_slot: u64,
    pub slots_per_epoch: u64,
    pub seconds_per_epoch: u64,
    pub epochs_per_sync_committee_period: u64,
}

impl Eth2Config {
    pub fn epoch_at(&self, unix_time: u64) -> u64 {
        if unix_time < self.genesis_time || self.seconds_per_epoch == 0 {
            return self.genesis_epoch;
        }
        self.genesis_epoch + (unix_time - self.genesis_time) / self.seconds_per_epoch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eth2DepositContract {
    pub chain_id: u64,
    pub address: Address,
}
