use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stakenode_keystore::keystore::{DEFAULT_PBKDF2_ITERATIONS, EncryptedKeystore, Keystore};
use tracing::info;

use crate::collaborators::KeyManager;

/// Stores each generated validator key as an EIP-2335 keystore file named after its public key.
#[derive(Debug, Clone)]
pub struct KeystoreKeyManager {
    directory: PathBuf,
    password: String,
    iterations: u32,
}

impl KeystoreKeyManager {
    pub fn new(directory: impl Into<PathBuf>, password: String) -> Self {
        Self {
            directory: directory.into(),
            password,
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn keystore_path(directory: &Path, keystore: &Keystore) -> PathBuf {
        directory.join(format!("keystore-{}.json", keystore.public_key))
    }
}

#[async_trait]
impl KeyManager for KeystoreKeyManager {
    async fn create_validator_key(&self) -> anyhow::Result<Keystore> {
        let manager = self.clone();
        // Key derivation is CPU bound and file writes block.
        tokio::task::spawn_blocking(move || {
            let keystore = Keystore::random()?;
            let path = Self::keystore_path(&manager.directory, &keystore);
            EncryptedKeystore::encrypt(
                &keystore,
                manager.password.as_bytes(),
                manager.iterations,
                String::new(),
                String::new(),
            )?
            .save_to_file(&path)?;
            info!(
                public_key = %keystore.public_key,
                path = %path.display(),
                "Stored validator key"
            );
            Ok(keystore)
        })
        .await?
    }
}
