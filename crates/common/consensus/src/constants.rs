use alloy_primitives::{aliases::B32, fixed_bytes};

pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;
pub const GENESIS_FORK_VERSION: B32 = fixed_bytes!("0x00000000");
pub const MAX_COMMITTEES_PER_SLOT: u64 = 64;
pub const SECONDS_PER_SLOT: u64 = 12;
pub const SLOTS_PER_EPOCH: u64 = 32;

// Domain types
pub const DOMAIN_DEPOSIT: B32 = fixed_bytes!("0x03000000");

pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Amount in gwei of a full validator deposit.
pub const FULL_DEPOSIT_AMOUNT: u64 = 32_000_000_000;
