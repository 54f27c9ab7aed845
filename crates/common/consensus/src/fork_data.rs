use alloy_primitives::{B256, aliases::B32};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Clone, Copy, Encode, Decode, TreeHash)]
pub struct ForkData {
    pub current_version: B32,
    pub genesis_validators_root: B256,
}

impl ForkData {
    pub fn compute_fork_data_root(&self) -> B256 {
        self.tree_hash_root()
    }
}
