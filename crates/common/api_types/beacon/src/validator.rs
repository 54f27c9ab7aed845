use std::{fmt, str::FromStr};

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use stakenode_bls::PublicKey;
use stakenode_consensus::{constants::FAR_FUTURE_EPOCH, validator::Validator};

use crate::id::ID;

/// Lifecycle state of a validator, as named by the Beacon API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorState {
    #[default]
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveExiting,
    ActiveSlashed,
    ExitedUnslashed,
    ExitedSlashed,
    WithdrawalPossible,
    WithdrawalDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorSuperstatus {
    Pending,
    Active,
    Exited,
    Withdrawal,
}

impl ValidatorState {
    /// Derives the state of `validator` at `epoch`, for nodes that only report raw records.
    pub fn from_validator(validator: &Validator, balance: u64, epoch: u64) -> Self {
        if validator.withdrawable_epoch <= epoch {
            if balance == 0 {
                ValidatorState::WithdrawalDone
            } else {
                ValidatorState::WithdrawalPossible
            }
        } else if validator.exit_epoch <= epoch {
            if validator.slashed {
                ValidatorState::ExitedSlashed
            } else {
                ValidatorState::ExitedUnslashed
            }
        } else if validator.activation_epoch <= epoch {
            if validator.exit_epoch == FAR_FUTURE_EPOCH {
                ValidatorState::ActiveOngoing
            } else if validator.slashed {
                ValidatorState::ActiveSlashed
            } else {
                ValidatorState::ActiveExiting
            }
        } else if validator.activation_eligibility_epoch == FAR_FUTURE_EPOCH {
            ValidatorState::PendingInitialized
        } else {
            ValidatorState::PendingQueued
        }
    }

    pub fn superstatus(&self) -> ValidatorSuperstatus {
        match self {
            ValidatorState::PendingInitialized | ValidatorState::PendingQueued => {
                ValidatorSuperstatus::Pending
            }
            ValidatorState::ActiveOngoing
            | ValidatorState::ActiveExiting
            | ValidatorState::ActiveSlashed => ValidatorSuperstatus::Active,
            ValidatorState::ExitedUnslashed | ValidatorState::ExitedSlashed => {
                ValidatorSuperstatus::Exited
            }
            ValidatorState::WithdrawalPossible | ValidatorState::WithdrawalDone => {
                ValidatorSuperstatus::Withdrawal
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorState::PendingInitialized => "pending_initialized",
            ValidatorState::PendingQueued => "pending_queued",
            ValidatorState::ActiveOngoing => "active_ongoing",
            ValidatorState::ActiveExiting => "active_exiting",
            ValidatorState::ActiveSlashed => "active_slashed",
            ValidatorState::ExitedUnslashed => "exited_unslashed",
            ValidatorState::ExitedSlashed => "exited_slashed",
            ValidatorState::WithdrawalPossible => "withdrawal_possible",
            ValidatorState::WithdrawalDone => "withdrawal_done",
        }
    }
}

impl fmt::Display for ValidatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_initialized" => Ok(ValidatorState::PendingInitialized),
            "pending_queued" => Ok(ValidatorState::PendingQueued),
            "active_ongoing" => Ok(ValidatorState::ActiveOngoing),
            "active_exiting" => Ok(ValidatorState::ActiveExiting),
            "active_slashed" => Ok(ValidatorState::ActiveSlashed),
            "exited_unslashed" => Ok(ValidatorState::ExitedUnslashed),
            "exited_slashed" => Ok(ValidatorState::ExitedSlashed),
            "withdrawal_possible" => Ok(ValidatorState::WithdrawalPossible),
            "withdrawal_done" => Ok(ValidatorState::WithdrawalDone),
            _ => Err(format!("Unknown validator state: {s}")),
        }
    }
}

/// A validator as seen at one beacon state.
///
/// When `exists` is false the validator was queried but is not in the registry, and every other
/// field holds its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidatorStatus {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    pub index: u64,
    pub withdrawal_credentials: B256,
    /// Balance in gwei.
    pub balance: u64,
    pub status: ValidatorState,
    pub effective_balance: u64,
    pub slashed: bool,
    pub activation_eligibility_epoch: u64,
    pub activation_epoch: u64,
    pub exit_epoch: u64,
    pub withdrawable_epoch: u64,
    pub exists: bool,
}

impl ValidatorStatus {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn from_record(
        index: u64,
        balance: u64,
        status: ValidatorState,
        validator: Validator,
    ) -> Self {
        Self {
            public_key: validator.public_key,
            index,
            withdrawal_credentials: validator.withdrawal_credentials,
            balance,
            status,
            effective_balance: validator.effective_balance,
            slashed: validator.slashed,
            activation_eligibility_epoch: validator.activation_eligibility_epoch,
            activation_epoch: validator.activation_epoch,
            exit_epoch: validator.exit_epoch,
            withdrawable_epoch: validator.withdrawable_epoch,
            exists: true,
        }
    }
}

/// A status as the node reports it. Most nodes send one of the nine states; some only send a
/// coarse label such as `active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedState {
    Exact(ValidatorState),
    Coarse(String),
}

/// One entry of `/eth/v1/beacon/states/{state_id}/validators`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub balance: u64,
    pub status: ReportedState,
    pub validator: Validator,
}

impl ValidatorData {
    pub fn has_exact_state(&self) -> bool {
        matches!(self.status, ReportedState::Exact(_))
    }

    /// A coarse status is replaced by the state derived from the record at `epoch`, the epoch of
    /// the queried beacon state.
    pub fn into_status(self, epoch: u64) -> ValidatorStatus {
        let status = match &self.status {
            ReportedState::Exact(state) => *state,
            ReportedState::Coarse(_) => {
                ValidatorState::from_validator(&self.validator, self.balance, epoch)
            }
        };
        ValidatorStatus::from_record(self.index, self.balance, status, self.validator)
    }
}

/// Selects the beacon state a validator query is answered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorStatusOptions {
    pub epoch: Option<u64>,
    pub slot: Option<u64>,
}

impl ValidatorStatusOptions {
    pub fn at_epoch(epoch: u64) -> Self {
        Self {
            epoch: Some(epoch),
            slot: None,
        }
    }

    pub fn at_slot(slot: u64) -> Self {
        Self {
            epoch: None,
            slot: Some(slot),
        }
    }

    /// An explicit slot wins over an epoch; with neither the head state is used.
    pub fn state_id(&self, slots_per_epoch: u64) -> ID {
        match (self.slot, self.epoch) {
            (Some(slot), _) => ID::Slot(slot),
            (None, Some(epoch)) => ID::Slot(epoch.saturating_mul(slots_per_epoch)),
            (None, None) => ID::Head,
        }
    }

    /// Epoch of the selected state, or `None` for the head state.
    pub fn state_epoch(&self, slots_per_epoch: u64) -> Option<u64> {
        match (self.slot, self.epoch) {
            (Some(slot), _) => Some(slot / slots_per_epoch.max(1)),
            (None, epoch) => epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn validator(
        activation_eligibility_epoch: u64,
        activation_epoch: u64,
        exit_epoch: u64,
        withdrawable_epoch: u64,
        slashed: bool,
    ) -> Validator {
        Validator {
            public_key: PublicKey::default(),
            withdrawal_credentials: B256::ZERO,
            effective_balance: 32_000_000_000,
            slashed,
            activation_eligibility_epoch,
            activation_epoch,
            exit_epoch,
            withdrawable_epoch,
        }
    }

    const FAR: u64 = FAR_FUTURE_EPOCH;

    #[rstest]
    #[case(validator(FAR, FAR, FAR, FAR, false), 32, 10, ValidatorState::PendingInitialized)]
    #[case(validator(5, FAR, FAR, FAR, false), 32, 10, ValidatorState::PendingQueued)]
    #[case(validator(5, 8, FAR, FAR, false), 32, 10, ValidatorState::ActiveOngoing)]
    #[case(validator(5, 8, 20, 276, false), 32, 10, ValidatorState::ActiveExiting)]
    #[case(validator(5, 8, 20, 276, true), 32, 10, ValidatorState::ActiveSlashed)]
    #[case(validator(5, 8, 20, 276, false), 32, 30, ValidatorState::ExitedUnslashed)]
    #[case(validator(5, 8, 20, 276, true), 32, 30, ValidatorState::ExitedSlashed)]
    #[case(validator(5, 8, 20, 276, false), 32, 300, ValidatorState::WithdrawalPossible)]
    #[case(validator(5, 8, 20, 276, false), 0, 300, ValidatorState::WithdrawalDone)]
    fn derives_state(
        #[case] validator: Validator,
        #[case] balance: u64,
        #[case] epoch: u64,
        #[case] expected: ValidatorState,
    ) {
        assert_eq!(ValidatorState::from_validator(&validator, balance, epoch), expected);
    }

    #[test]
    fn superstatus_groups_states() {
        assert_eq!(
            ValidatorState::PendingQueued.superstatus(),
            ValidatorSuperstatus::Pending
        );
        assert_eq!(
            ValidatorState::ActiveSlashed.superstatus(),
            ValidatorSuperstatus::Active
        );
        assert_eq!(
            ValidatorState::ExitedUnslashed.superstatus(),
            ValidatorSuperstatus::Exited
        );
        assert_eq!(
            ValidatorState::WithdrawalDone.superstatus(),
            ValidatorSuperstatus::Withdrawal
        );
    }

    #[test]
    fn state_strings_roundtrip() {
        for state in [
            ValidatorState::PendingInitialized,
            ValidatorState::ActiveExiting,
            ValidatorState::WithdrawalPossible,
        ] {
            assert_eq!(ValidatorState::from_str(state.as_str()), Ok(state));
            assert_eq!(
                serde_json::to_string(&state).expect("serialize"),
                format!("\"{state}\"")
            );
        }
        assert!(ValidatorState::from_str("active").is_err());
    }

    #[test]
    fn absent_status_is_zeroed() {
        let status = ValidatorStatus::absent();
        assert!(!status.exists);
        assert_eq!(status.index, 0);
        assert_eq!(status.balance, 0);
        assert_eq!(status.public_key, PublicKey::default());
    }

    #[rstest]
    #[case(ValidatorStatusOptions::default(), ID::Head)]
    #[case(ValidatorStatusOptions::at_slot(77), ID::Slot(77))]
    #[case(ValidatorStatusOptions::at_epoch(3), ID::Slot(96))]
    #[case(ValidatorStatusOptions { epoch: Some(3), slot: Some(5) }, ID::Slot(5))]
    fn selects_state(#[case] options: ValidatorStatusOptions, #[case] expected: ID) {
        assert_eq!(options.state_id(32), expected);
    }

    #[test]
    fn state_epoch_follows_state_selection() {
        assert_eq!(ValidatorStatusOptions::default().state_epoch(32), None);
        assert_eq!(ValidatorStatusOptions::at_slot(70).state_epoch(32), Some(2));
        assert_eq!(ValidatorStatusOptions::at_epoch(9).state_epoch(32), Some(9));
        assert_eq!(
            ValidatorStatusOptions::at_epoch(u64::MAX).state_id(32),
            ID::Slot(u64::MAX)
        );
    }

    fn validator_json(status: &str) -> String {
        format!(
            r#"{{"index":"7","balance":"31000000000","status":"{status}","validator":{{"pubkey":"0x{}","withdrawal_credentials":"0x{}","effective_balance":"31000000000","slashed":false,"activation_eligibility_epoch":"5","activation_epoch":"8","exit_epoch":"20","withdrawable_epoch":"276"}}}}"#,
            "00".repeat(48),
            "01".repeat(32)
        )
    }

    #[test]
    fn exact_status_is_kept() {
        let data: ValidatorData =
            serde_json::from_str(&validator_json("active_exiting")).expect("deserialize");
        assert!(data.has_exact_state());
        let status = data.into_status(300);
        assert!(status.exists);
        assert_eq!(status.status, ValidatorState::ActiveExiting);
    }

    #[rstest]
    #[case(10, ValidatorState::ActiveExiting)]
    #[case(30, ValidatorState::ExitedUnslashed)]
    #[case(300, ValidatorState::WithdrawalPossible)]
    fn coarse_status_is_derived_from_record(#[case] epoch: u64, #[case] expected: ValidatorState) {
        let data: ValidatorData =
            serde_json::from_str(&validator_json("active")).expect("deserialize");
        assert_eq!(data.status, ReportedState::Coarse("active".to_string()));
        assert!(!data.has_exact_state());

        let status = data.into_status(epoch);
        assert_eq!(status.index, 7);
        assert_eq!(status.balance, 31_000_000_000);
        assert_eq!(status.status, expected);
    }
}
