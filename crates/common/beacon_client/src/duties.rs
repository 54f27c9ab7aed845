use std::collections::HashMap;

/// Marks each requested index that appears among the sync committee duties. Every requested
/// index gets an entry; duties for other validators are ignored.
pub fn sync_committee_membership(
    indices: &[u64],
    duty_indices: impl IntoIterator<Item = u64>,
) -> HashMap<u64, bool> {
    let mut membership = indices
        .iter()
        .map(|index| (*index, false))
        .collect::<HashMap<_, _>>();
    for duty_index in duty_indices {
        if let Some(in_committee) = membership.get_mut(&duty_index) {
            *in_committee = true;
        }
    }
    membership
}

/// Counts the proposals each requested index holds in an epoch's proposer duties.
pub fn proposal_counts(
    indices: &[u64],
    duty_indices: impl IntoIterator<Item = u64>,
) -> HashMap<u64, u64> {
    let mut counts = indices
        .iter()
        .map(|index| (*index, 0))
        .collect::<HashMap<_, _>>();
    for duty_index in duty_indices {
        if let Some(proposals) = counts.get_mut(&duty_index) {
            *proposals += 1;
        }
    }
    counts
}
