use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use stakenode_api_types_beacon::id::ID;
use tracing::warn;

use crate::error::BeaconError;

/// Balances in gwei for a set of validator indices at one state, as `(index, balance)` pairs.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balances(
        &self,
        state_id: &ID,
        indices: &[u64],
    ) -> Result<Vec<(u64, u64)>, BeaconError>;
}

/// Splits balance lookups into concurrent batches.
#[derive(Debug, Clone)]
pub struct BalanceBatcher<S> {
    source: S,
    batch_size: usize,
}

impl<S: BalanceSource> BalanceBatcher<S> {
    pub fn new(source: S, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fails the whole lookup when any batch fails.
    pub async fn balances(
        &self,
        state_id: &ID,
        indices: &[u64],
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        let batches = try_join_all(
            indices
                .chunks(self.batch_size)
                .map(|batch| self.source.fetch_balances(state_id, batch)),
        )
        .await?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Skips failed batches. Their indices are missing from the result, so a missing entry
    /// means "unknown", never zero.
    pub async fn balances_safe(&self, state_id: &ID, indices: &[u64]) -> HashMap<u64, u64> {
        let batches = indices.chunks(self.batch_size).collect::<Vec<_>>();
        let results = join_all(
            batches
                .iter()
                .map(|batch| self.source.fetch_balances(state_id, batch)),
        )
        .await;

        let mut balances = HashMap::with_capacity(indices.len());
        for (batch, result) in batches.iter().zip(results) {
            match result {
                Ok(batch_balances) => balances.extend(batch_balances),
                Err(err) => warn!(
                    validators = batch.len(),
                    %state_id,
                    "Skipping balance batch: {err}"
                ),
            }
        }
        balances
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing_test::traced_test;

    use super::*;

    /// Every validator holds `index * 10` gwei; batches containing `failing_index` fail.
    #[derive(Default)]
    struct MockSource {
        calls: AtomicUsize,
        failing_index: Option<u64>,
    }

    #[async_trait]
    impl BalanceSource for MockSource {
        async fn fetch_balances(
            &self,
            _state_id: &ID,
            indices: &[u64],
        ) -> Result<Vec<(u64, u64)>, BeaconError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failing_index
                .is_some_and(|failing_index| indices.contains(&failing_index))
            {
                return Err(BeaconError::InvalidResponse("state not available".to_string()));
            }
            Ok(indices.iter().map(|index| (*index, index * 10)).collect())
        }
    }

    fn batcher(failing_index: Option<u64>) -> BalanceBatcher<MockSource> {
        BalanceBatcher::new(
            MockSource {
                failing_index,
                ..Default::default()
            },
            2,
        )
    }

    #[tokio::test]
    async fn strict_lookup_returns_every_balance() {
        let batcher = batcher(None);
        let balances = batcher
            .balances(&ID::Head, &[1, 2, 3, 4, 5])
            .await
            .expect("balances");

        assert_eq!(balances.len(), 5);
        assert_eq!(balances[&4], 40);
        assert_eq!(batcher.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn strict_lookup_fails_on_any_failed_batch() {
        let result = batcher(Some(3)).balances(&ID::Head, &[1, 2, 3, 4, 5]).await;
        assert!(matches!(result, Err(BeaconError::InvalidResponse(_))));
    }

    #[tokio::test]
    #[traced_test]
    async fn safe_lookup_omits_failed_batch() {
        let balances = batcher(Some(3))
            .balances_safe(&ID::Slot(64), &[1, 2, 3, 4, 5])
            .await;

        assert_eq!(balances, HashMap::from([(1, 10), (2, 20), (5, 50)]));
        assert!(!balances.contains_key(&3));
        assert!(!balances.contains_key(&4));
        assert!(logs_contain("Skipping balance batch: Invalid response: state not available"));
    }

    #[tokio::test]
    async fn empty_lookup_makes_no_calls() {
        let batcher = batcher(None);
        assert!(batcher.balances_safe(&ID::Head, &[]).await.is_empty());
        assert_eq!(batcher.source().calls.load(Ordering::SeqCst), 0);
    }
}
