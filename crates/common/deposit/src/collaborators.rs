use std::fmt;

use alloy_primitives::B256;
use async_trait::async_trait;
use stakenode_keystore::keystore::Keystore;

/// On-chain contracts the reservation workflow talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
    /// The operator's own node contract.
    Node,
    /// Protocol-wide node settings.
    NodeSettings,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Node => write!(f, "rocketNodeContract"),
            Contract::NodeSettings => write!(f, "rocketNodeSettings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractArgument {
    String(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub contract: Contract,
    pub method: &'static str,
    pub arguments: Vec<ContractArgument>,
    /// Replaces a stuck pending transaction of the same sender when set.
    pub nonce: Option<u64>,
}

/// Read-only chain state access.
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn call_bool(&self, contract: Contract, method: &'static str) -> anyhow::Result<bool>;

    /// Reads a boolean from the protocol's global key/value storage contract.
    async fn storage_bool(&self, key: B256) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ContractTransactor: Send + Sync {
    /// Submits a state-changing transaction and returns its hash once the node accepts it.
    async fn transact(&self, request: TransactionRequest) -> anyhow::Result<B256>;
}

#[async_trait]
pub trait KeyManager: Send + Sync {
    /// Mints a validator keypair and persists it durably before returning it.
    async fn create_validator_key(&self) -> anyhow::Result<Keystore>;
}
