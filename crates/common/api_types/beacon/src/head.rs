use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BeaconHead {
    pub epoch: u64,
    pub finalized_epoch: u64,
    pub justified_epoch: u64,
    pub previous_justified_epoch: u64,
}
