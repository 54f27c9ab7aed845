use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ssz_types::{
    BitList, BitVector,
    typenum::{U64, U131072},
};
use stakenode_consensus::misc::get_committee_indices;

use crate::error::AttestationError;

/// Aggregation bits of an Electra attestation span up to
/// 2048 validators per committee times `MAX_COMMITTEES_PER_SLOT` positions.
pub type AggregationBits = BitList<U131072>;

/// Attesting positions of one attestation, possibly covering several committees of a slot.
///
/// The committees named by `committee_bits` are packed back-to-back in `aggregation_bits`,
/// ordered by ascending committee index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationInfo {
    pub aggregation_bits: AggregationBits,
    pub slot_index: u64,
    pub committee_bits: BitVector<U64>,
}

impl AttestationInfo {
    /// Committee indices carried by this attestation, strictly ascending.
    pub fn committee_indices(&self) -> Vec<u64> {
        get_committee_indices(&self.committee_bits)
    }

    /// Absolute position of `position` within `committee_index` in the aggregation bits.
    ///
    /// Every committee packed before the target must have its size in `committee_sizes`.
    pub fn bit_offset(
        &self,
        committee_index: u64,
        position: usize,
        committee_sizes: &HashMap<u64, usize>,
    ) -> Result<usize, AttestationError> {
        let mut offset = 0;
        let mut is_member = false;
        for index in self.committee_indices() {
            if index == committee_index {
                is_member = true;
                break;
            }
            offset += committee_sizes
                .get(&index)
                .ok_or(AttestationError::MissingCommitteeSize {
                    committee_index: index,
                })?;
        }
        if !is_member {
            return Err(AttestationError::CommitteeNotInAttestation { committee_index });
        }
        if let Some(&size) = committee_sizes.get(&committee_index)
            && position >= size
        {
            return Err(AttestationError::PositionOutOfRange {
                committee_index,
                position,
                size,
            });
        }
        Ok(offset + position)
    }

    /// Whether the validator at `position` in committee `committee_index` is in this aggregate.
    pub fn validator_attested(
        &self,
        committee_index: u64,
        position: usize,
        committee_sizes: &HashMap<u64, usize>,
    ) -> Result<bool, AttestationError> {
        let offset = self.bit_offset(committee_index, position, committee_sizes)?;
        self.aggregation_bits
            .get(offset)
            .map_err(|_| AttestationError::OffsetOutOfRange {
                offset,
                length: self.aggregation_bits.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn committee_bits(indices: &[usize]) -> BitVector<U64> {
        let mut bits = BitVector::<U64>::new();
        for index in indices {
            bits.set(*index, true).expect("committee index in range");
        }
        bits
    }

    fn aggregation_bits(length: usize, set: &[usize]) -> AggregationBits {
        let mut bits = AggregationBits::with_capacity(length).expect("length in range");
        for position in set {
            bits.set(*position, true).expect("position in range");
        }
        bits
    }

    /// Committees 2 (size 3), 5 (size 4) and 9 (size 2) packed into 9 bits.
    fn attestation(set: &[usize]) -> AttestationInfo {
        AttestationInfo {
            aggregation_bits: aggregation_bits(9, set),
            slot_index: 100,
            committee_bits: committee_bits(&[9, 2, 5]),
        }
    }

    fn sizes() -> HashMap<u64, usize> {
        HashMap::from([(2, 3), (5, 4), (9, 2)])
    }

    #[rstest]
    #[case(&[], vec![])]
    #[case(&[0], vec![0])]
    #[case(&[63, 0, 31], vec![0, 31, 63])]
    #[case(&[40, 12, 13, 7], vec![7, 12, 13, 40])]
    fn committee_indices_are_ascending(#[case] set: &[usize], #[case] expected: Vec<u64>) {
        let info = AttestationInfo {
            aggregation_bits: aggregation_bits(1, &[]),
            slot_index: 0,
            committee_bits: committee_bits(set),
        };
        assert_eq!(info.committee_indices(), expected);
    }

    #[rstest]
    #[case(2, 0, 0)]
    #[case(2, 2, 2)]
    #[case(5, 0, 3)]
    #[case(5, 3, 6)]
    #[case(9, 1, 8)]
    fn offsets_accumulate_preceding_committees(
        #[case] committee_index: u64,
        #[case] position: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(
            attestation(&[])
                .bit_offset(committee_index, position, &sizes())
                .expect("valid offset"),
            expected
        );
    }

    #[test]
    fn lowest_committee_needs_no_sizes() {
        assert_eq!(attestation(&[]).bit_offset(2, 0, &HashMap::new()), Ok(0));
    }

    #[test]
    fn reads_attesting_bits() {
        let info = attestation(&[1, 4, 8]);
        let sizes = sizes();
        assert_eq!(info.validator_attested(2, 1, &sizes), Ok(true));
        assert_eq!(info.validator_attested(2, 0, &sizes), Ok(false));
        assert_eq!(info.validator_attested(5, 1, &sizes), Ok(true));
        assert_eq!(info.validator_attested(9, 1, &sizes), Ok(true));
        assert_eq!(info.validator_attested(9, 0, &sizes), Ok(false));
    }

    #[test]
    fn non_member_committee_is_an_error() {
        assert_eq!(
            attestation(&[]).validator_attested(3, 0, &sizes()),
            Err(AttestationError::CommitteeNotInAttestation { committee_index: 3 })
        );
    }

    #[test]
    fn missing_preceding_size_is_an_error() {
        let mut sizes = sizes();
        sizes.remove(&2);
        assert_eq!(
            attestation(&[]).validator_attested(5, 0, &sizes),
            Err(AttestationError::MissingCommitteeSize { committee_index: 2 })
        );
    }

    #[test]
    fn position_past_committee_is_an_error() {
        assert_eq!(
            attestation(&[]).validator_attested(2, 3, &sizes()),
            Err(AttestationError::PositionOutOfRange {
                committee_index: 2,
                position: 3,
                size: 3
            })
        );
    }

    #[test]
    fn offset_past_aggregation_bits_is_an_error() {
        let mut sizes = sizes();
        sizes.insert(9, 10);
        assert_eq!(
            attestation(&[]).validator_attested(9, 5, &sizes),
            Err(AttestationError::OffsetOutOfRange {
                offset: 12,
                length: 9
            })
        );
    }
}
