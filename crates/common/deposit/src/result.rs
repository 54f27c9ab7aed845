use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use stakenode_consensus::deposit_data::DepositData;

/// Outcome of one reservation attempt that did not fail.
///
/// `success` is set only after the reservation transaction was accepted. A rejected attempt
/// reports the eligibility facts with `success == false` and nothing else.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReserveResult {
    pub success: bool,
    pub has_existing_reservation: bool,
    pub deposits_enabled: bool,
    pub pubkey_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_data: Option<DepositData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
}

impl DepositReserveResult {
    pub fn is_eligible(&self) -> bool {
        !self.has_existing_reservation && self.deposits_enabled && !self.pubkey_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_result_json() {
        let result = DepositReserveResult {
            has_existing_reservation: true,
            deposits_enabled: true,
            ..Default::default()
        };
        assert!(!result.is_eligible());
        assert_eq!(
            serde_json::to_string(&result).expect("serialize"),
            r#"{"success":false,"hasExistingReservation":true,"depositsEnabled":true,"pubkeyUsed":false}"#
        );
    }

    #[test]
    fn eligibility_needs_all_three_facts() {
        let mut result = DepositReserveResult {
            deposits_enabled: true,
            ..Default::default()
        };
        assert!(result.is_eligible());
        result.pubkey_used = true;
        assert!(!result.is_eligible());
        result.pubkey_used = false;
        result.deposits_enabled = false;
        assert!(!result.is_eligible());
    }
}
