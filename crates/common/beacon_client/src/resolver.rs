use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::future::try_join_all;
use stakenode_api_types_beacon::{
    id::{ID, ValidatorID},
    validator::{ValidatorData, ValidatorStatus, ValidatorStatusOptions},
};
use stakenode_bls::PublicKey;
use tracing::debug;

use crate::error::BeaconError;

/// Default number of validator ids sent in one request.
pub const DEFAULT_VALIDATOR_BATCH_SIZE: usize = 600;

/// Raw validator records for a set of ids at one state. Ids unknown to the chain are omitted.
#[async_trait]
pub trait ValidatorSource: Send + Sync {
    async fn fetch_validators(
        &self,
        state_id: &ID,
        validator_ids: &[ValidatorID],
    ) -> Result<Vec<ValidatorData>, BeaconError>;

    /// Slot of the current head state.
    async fn head_slot(&self) -> Result<u64, BeaconError>;
}

/// Turns batches of validator ids into a complete status map: every requested id gets an entry,
/// and ids missing on chain get [ValidatorStatus::absent].
#[derive(Debug, Clone)]
pub struct ValidatorStatusResolver<S> {
    source: S,
    batch_size: usize,
    slots_per_epoch: u64,
}

impl<S: ValidatorSource> ValidatorStatusResolver<S> {
    pub fn new(source: S, batch_size: usize, slots_per_epoch: u64) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
            slots_per_epoch: slots_per_epoch.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn statuses_by_public_key(
        &self,
        public_keys: &[PublicKey],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<PublicKey, ValidatorStatus>, BeaconError> {
        let ids = unique(public_keys.iter().cloned().map(ValidatorID::Address));
        let mut statuses = self
            .fetch(ids, options)
            .await?
            .into_iter()
            .map(|status| (status.public_key.clone(), status))
            .collect::<HashMap<_, _>>();
        for public_key in public_keys {
            statuses
                .entry(public_key.clone())
                .or_insert_with(ValidatorStatus::absent);
        }
        Ok(statuses)
    }

    pub async fn statuses_by_index(
        &self,
        indices: &[u64],
        options: ValidatorStatusOptions,
    ) -> Result<HashMap<u64, ValidatorStatus>, BeaconError> {
        let ids = unique(indices.iter().copied().map(ValidatorID::Index));
        let mut statuses = self
            .fetch(ids, options)
            .await?
            .into_iter()
            .map(|status| (status.index, status))
            .collect::<HashMap<_, _>>();
        for index in indices {
            statuses
                .entry(*index)
                .or_insert_with(ValidatorStatus::absent);
        }
        Ok(statuses)
    }

    async fn fetch(
        &self,
        ids: Vec<ValidatorID>,
        options: ValidatorStatusOptions,
    ) -> Result<Vec<ValidatorStatus>, BeaconError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let state_id = options.state_id(self.slots_per_epoch);
        debug!(
            validators = ids.len(),
            batches = ids.len().div_ceil(self.batch_size),
            %state_id,
            "Resolving validator statuses"
        );
        let batches = try_join_all(
            ids.chunks(self.batch_size)
                .map(|batch| self.source.fetch_validators(&state_id, batch)),
        )
        .await?;
        let records = batches.into_iter().flatten().collect::<Vec<_>>();

        let epoch = match options.state_epoch(self.slots_per_epoch) {
            Some(epoch) => epoch,
            None if records.iter().any(|data| !data.has_exact_state()) => {
                let head_slot = self.source.head_slot().await?;
                debug!(head_slot, "Deriving coarse validator statuses at head");
                head_slot / self.slots_per_epoch
            }
            // Exact statuses never read the epoch.
            None => 0,
        };
        Ok(records
            .into_iter()
            .map(|data| data.into_status(epoch))
            .collect())
    }
}

fn unique(ids: impl Iterator<Item = ValidatorID>) -> Vec<ValidatorID> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}
