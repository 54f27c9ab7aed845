use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttestationError {
    #[error("Committee {committee_index} is not part of this attestation")]
    CommitteeNotInAttestation { committee_index: u64 },

    #[error("Size of committee {committee_index} is unknown")]
    MissingCommitteeSize { committee_index: u64 },

    #[error("Position {position} is outside committee {committee_index} of size {size}")]
    PositionOutOfRange {
        committee_index: u64,
        position: usize,
        size: usize,
    },

    #[error("Bit offset {offset} exceeds aggregation bits length {length}")]
    OffsetOutOfRange { offset: usize, length: usize },
}
