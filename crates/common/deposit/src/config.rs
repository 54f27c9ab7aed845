use alloy_primitives::{aliases::B32, hex};
use stakenode_bls::PublicKey;
use stakenode_consensus::constants::GENESIS_FORK_VERSION;
use stakenode_network_spec::networks::NetworkSpec;

/// Withdrawal key shipped until the protocol publishes its real one. Deposits made against it
/// cannot be withdrawn by anyone.
pub const PLACEHOLDER_WITHDRAWAL_PUBLIC_KEY: [u8; 48] = hex!(
    "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfig {
    /// Key the deposit's withdrawal credentials commit to.
    pub withdrawal_public_key: PublicKey,
    /// Fork version the deposit domain is computed against.
    pub genesis_fork_version: B32,
}

impl ReservationConfig {
    pub fn new(withdrawal_public_key: PublicKey, genesis_fork_version: B32) -> Self {
        Self {
            withdrawal_public_key,
            genesis_fork_version,
        }
    }

    /// Placeholder withdrawal key with the network's genesis fork version.
    pub fn for_network(network_spec: &NetworkSpec) -> Self {
        Self {
            genesis_fork_version: network_spec.genesis_fork_version,
            ..Self::default()
        }
    }

    pub fn uses_placeholder_withdrawal_key(&self) -> bool {
        self.withdrawal_public_key.to_bytes() == PLACEHOLDER_WITHDRAWAL_PUBLIC_KEY.as_slice()
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            withdrawal_public_key: placeholder_withdrawal_public_key(),
            genesis_fork_version: GENESIS_FORK_VERSION,
        }
    }
}

fn placeholder_withdrawal_public_key() -> PublicKey {
    PublicKey::from_bytes(&PLACEHOLDER_WITHDRAWAL_PUBLIC_KEY).unwrap_or_default()
}
