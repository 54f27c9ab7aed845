use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SyncStatus {
    pub syncing: bool,
    /// Fraction of the chain processed, in `[0, 1]`.
    pub progress: f64,
}

impl SyncStatus {
    pub fn from_head(head_slot: u64, sync_distance: u64, is_syncing: bool) -> Self {
        let total = head_slot.saturating_add(sync_distance);
        let progress = if total == 0 {
            0.0
        } else {
            head_slot as f64 / total as f64
        };
        Self {
            syncing: is_syncing,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_from_distance() {
        let status = SyncStatus::from_head(750, 250, true);
        assert!(status.syncing);
        assert!((status.progress - 0.75).abs() < f64::EPSILON);

        assert_eq!(SyncStatus::from_head(0, 0, true).progress, 0.0);
        assert_eq!(SyncStatus::from_head(100, 0, false).progress, 1.0);
    }
}
