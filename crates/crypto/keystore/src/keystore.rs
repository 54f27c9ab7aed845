use std::{fs, io::Write, path::Path};

use anyhow::{Result, anyhow, ensure};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use stakenode_bls::{PrivateKey, PublicKey};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::{cipher::aes128_ctr, hex_serde, pbkdf2::pbkdf2};

pub const KEYSTORE_VERSION: u64 = 4;
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 262_144;
pub const DERIVED_KEY_LENGTH: u32 = 32;

/// A decrypted validator keypair.
#[derive(Debug, Clone)]
pub struct Keystore {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl Keystore {
    /// Mints a fresh keypair. The secret exists only in memory until it is encrypted and saved.
    pub fn random() -> Result<Self> {
        let private_key =
            PrivateKey::random().map_err(|err| anyhow!("Failed to generate private key: {err}"))?;
        let public_key = private_key
            .public_key()
            .map_err(|err| anyhow!("Failed to derive public key: {err}"))?;
        Ok(Self {
            public_key,
            private_key,
        })
    }
}

/// EIP-2335 version 4 keystore.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct EncryptedKeystore {
    pub crypto: Crypto,
    pub description: String,
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    pub path: String,
    pub uuid: String,
    pub version: u64,
}

impl EncryptedKeystore {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(serde_json::from_str(fs::read_to_string(path)?.as_str())?)
    }

    /// Writes the keystore to a temporary file in the target directory, syncs it and links it
    /// into place. Fails without touching `path` if a file already exists there; the temporary
    /// file is removed on every failure.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(serde_json::to_string(self)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist_noclobber(path).map_err(|err| {
            anyhow!("Failed to store keystore {}: {}", path.display(), err.error)
        })?;
        Ok(())
    }

    pub fn encrypt(
        keystore: &Keystore,
        password: &[u8],
        iterations: u32,
        description: String,
        path: String,
    ) -> Result<Self> {
        let kdf = KdfParams::Pbkdf2 {
            c: iterations,
            dklen: DERIVED_KEY_LENGTH,
            prf: Prf::HmacSha256,
            salt: rand::random::<[u8; 32]>().to_vec(),
        };
        let initial_vector = rand::random::<[u8; 16]>();
        let derived_key = kdf.derive_key(password)?;

        let mut cipher_message = keystore.private_key.to_bytes().to_vec();
        aes128_ctr(
            &mut cipher_message,
            <[u8; 16]>::try_from(&derived_key[..16])?,
            &initial_vector,
        );

        Ok(Self {
            crypto: Crypto {
                kdf: FunctionBlock {
                    params: kdf,
                    message: vec![],
                },
                checksum: FunctionBlock {
                    params: ChecksumParams::Sha256 {},
                    message: checksum(&derived_key, &cipher_message),
                },
                cipher: FunctionBlock {
                    params: CipherParams::Aes128Ctr {
                        iv: initial_vector.to_vec(),
                    },
                    message: cipher_message,
                },
            },
            description,
            public_key: keystore.public_key.clone(),
            path,
            uuid: Uuid::new_v4().to_string(),
            version: KEYSTORE_VERSION,
        })
    }

    pub fn validate_password(&self, password: &[u8]) -> Result<bool> {
        let derived_key = self.crypto.kdf.params.derive_key(password)?;
        Ok(checksum(&derived_key, &self.crypto.cipher.message) == self.crypto.checksum.message)
    }

    pub fn decrypt(&self, password: &[u8]) -> Result<Keystore> {
        let derived_key = self.crypto.kdf.params.derive_key(password)?;
        ensure!(
            checksum(&derived_key, &self.crypto.cipher.message) == self.crypto.checksum.message,
            "Password provided is invalid!"
        );

        let mut secret = self.crypto.cipher.message.clone();
        match &self.crypto.cipher.params {
            CipherParams::Aes128Ctr { iv } => {
                let iv_param: &[u8; 16] = iv.as_slice().try_into().map_err(|err| {
                    anyhow!("Failed to convert initial vector into 16 byte array: {err:?}")
                })?;
                aes128_ctr(&mut secret, <[u8; 16]>::try_from(&derived_key[..16])?, iv_param);
            }
        };
        ensure!(secret.len() == 32, "Decrypted secret must be 32 bytes");

        let private_key = PrivateKey::from_bytes(&secret);
        let public_key = private_key
            .public_key()
            .map_err(|err| anyhow!("Decrypted secret is not a valid BLS key: {err}"))?;
        ensure!(
            public_key == self.public_key,
            "Decrypted secret does not match keystore public key {}",
            self.public_key
        );

        Ok(Keystore {
            public_key,
            private_key,
        })
    }
}

fn checksum(derived_key: &[u8], cipher_message: &[u8]) -> Vec<u8> {
    Sha256::digest([&derived_key[16..32], cipher_message].concat()).to_vec()
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Crypto {
    pub kdf: FunctionBlock<KdfParams>,
    pub checksum: FunctionBlock<ChecksumParams>,
    pub cipher: FunctionBlock<CipherParams>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct FunctionBlock<ParamType> {
    #[serde(flatten)]
    pub params: ParamType,
    #[serde(with = "hex_serde")]
    pub message: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "function", content = "params", rename_all = "lowercase")]
pub enum KdfParams {
    Pbkdf2 {
        c: u32,
        dklen: u32,
        prf: Prf,
        #[serde(with = "hex_serde")]
        salt: Vec<u8>,
    },
}

impl KdfParams {
    pub fn derive_key(&self, password: &[u8]) -> Result<Vec<u8>> {
        match self {
            KdfParams::Pbkdf2 {
                c,
                dklen,
                prf: Prf::HmacSha256,
                salt,
            } => {
                ensure!(
                    *dklen >= DERIVED_KEY_LENGTH,
                    "Derived key length must be at least {DERIVED_KEY_LENGTH} bytes"
                );
                Ok(pbkdf2(password, salt, *c, *dklen))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Prf {
    HmacSha256,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "function", content = "params")]
pub enum CipherParams {
    #[serde(rename = "aes-128-ctr")]
    Aes128Ctr {
        #[serde(with = "hex_serde")]
        iv: Vec<u8>,
    },
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "function", content = "params", rename_all = "lowercase")]
pub enum ChecksumParams {
    Sha256 {},
}
