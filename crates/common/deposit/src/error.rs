use std::fmt;

use stakenode_bls::errors::BLSError;
use thiserror::Error;

/// The three chain facts checked before a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityFact {
    ExistingReservation,
    DepositsEnabled,
    PublicKeyUsed,
}

impl EligibilityFact {
    pub const ALL: [EligibilityFact; 3] = [
        EligibilityFact::ExistingReservation,
        EligibilityFact::DepositsEnabled,
        EligibilityFact::PublicKeyUsed,
    ];
}

impl fmt::Display for EligibilityFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityFact::ExistingReservation => write!(f, "deposit reservation status"),
            EligibilityFact::DepositsEnabled => write!(f, "node deposits enabled status"),
            EligibilityFact::PublicKeyUsed => write!(f, "pubkey used status"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DepositError {
    #[error("Error generating validator key: {0}")]
    KeyGeneration(#[source] anyhow::Error),

    #[error("Error retrieving {fact}: {source}")]
    Eligibility {
        fact: EligibilityFact,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error building deposit data: {0}")]
    Hashing(String),

    #[error("Error signing deposit data: {0}")]
    Signing(#[from] BLSError),

    #[error("Error making deposit reservation: {0}")]
    Submission(#[source] anyhow::Error),
}
