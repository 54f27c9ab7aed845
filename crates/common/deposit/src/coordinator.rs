use std::{future::Future, sync::Arc};

use stakenode_bls::{
    PublicKey,
    errors::BLSError,
    traits::{Signable, Verifiable},
};
use stakenode_consensus::{constants::FULL_DEPOSIT_AMOUNT, deposit_data::DepositData};
use stakenode_keystore::keystore::Keystore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    collaborators::{
        Contract, ContractArgument, ContractReader, ContractTransactor, KeyManager,
        TransactionRequest,
    },
    config::ReservationConfig,
    error::{DepositError, EligibilityFact},
    result::DepositReserveResult,
    withdrawal_credentials::{bls_withdrawal_credentials, pubkey_used_key},
};

pub const HAS_DEPOSIT_RESERVATION_METHOD: &str = "getHasDepositReservation";
pub const DEPOSIT_ALLOWED_METHOD: &str = "getDepositAllowed";
pub const DEPOSIT_RESERVE_METHOD: &str = "depositReserve";

type FactOutcome = (EligibilityFact, anyhow::Result<bool>);

/// Runs one deposit reservation attempt: generate and store a validator key, check the three
/// eligibility facts concurrently, then build, sign and submit the deposit reservation.
///
/// At most one reservation transaction is submitted per attempt, and none when the attempt is
/// rejected or fails before signing.
pub struct DepositReservationCoordinator {
    key_manager: Arc<dyn KeyManager>,
    reader: Arc<dyn ContractReader>,
    transactor: Arc<dyn ContractTransactor>,
    config: ReservationConfig,
}

impl DepositReservationCoordinator {
    pub fn new(
        key_manager: Arc<dyn KeyManager>,
        reader: Arc<dyn ContractReader>,
        transactor: Arc<dyn ContractTransactor>,
        config: ReservationConfig,
    ) -> Self {
        Self {
            key_manager,
            reader,
            transactor,
            config,
        }
    }

    /// `nonce` overrides the transaction nonce, to replace a stuck reservation transaction.
    pub async fn reserve_deposit(
        &self,
        duration_id: &str,
        nonce: Option<u64>,
    ) -> Result<DepositReserveResult, DepositError> {
        let keystore = self
            .key_manager
            .create_validator_key()
            .await
            .map_err(DepositError::KeyGeneration)?;
        info!(public_key = %keystore.public_key, "Generated validator key");

        let mut result = self.check_eligibility(&keystore.public_key).await?;
        if !result.is_eligible() {
            info!(
                public_key = %keystore.public_key,
                has_existing_reservation = result.has_existing_reservation,
                deposits_enabled = result.deposits_enabled,
                pubkey_used = result.pubkey_used,
                "Deposit reservation rejected"
            );
            return Ok(result);
        }

        let deposit_data = self.build_deposit_data(&keystore)?;

        let transaction_hash = self
            .transactor
            .transact(TransactionRequest {
                contract: Contract::Node,
                method: DEPOSIT_RESERVE_METHOD,
                arguments: vec![
                    ContractArgument::String(duration_id.to_string()),
                    ContractArgument::Bytes(deposit_data.public_key.to_bytes().to_vec()),
                    ContractArgument::Bytes(deposit_data.signature.to_bytes().to_vec()),
                ],
                nonce,
            })
            .await
            .map_err(DepositError::Submission)?;
        info!(
            public_key = %keystore.public_key,
            %transaction_hash,
            duration_id,
            "Submitted deposit reservation"
        );

        result.success = true;
        result.deposit_data = Some(deposit_data);
        result.transaction_hash = Some(transaction_hash);
        Ok(result)
    }

    /// Checks the three facts concurrently. The first failing read aborts the check and cancels
    /// the reads still in flight.
    async fn check_eligibility(
        &self,
        public_key: &PublicKey,
    ) -> Result<DepositReserveResult, DepositError> {
        let cancellation = CancellationToken::new();
        let _cancel_on_return = cancellation.clone().drop_guard();
        let (sender, mut receiver) = mpsc::channel::<FactOutcome>(EligibilityFact::ALL.len());

        let reader = self.reader.clone();
        spawn_fact_check(
            EligibilityFact::ExistingReservation,
            async move {
                reader
                    .call_bool(Contract::Node, HAS_DEPOSIT_RESERVATION_METHOD)
                    .await
            },
            sender.clone(),
            cancellation.clone(),
        );
        let reader = self.reader.clone();
        spawn_fact_check(
            EligibilityFact::DepositsEnabled,
            async move {
                reader
                    .call_bool(Contract::NodeSettings, DEPOSIT_ALLOWED_METHOD)
                    .await
            },
            sender.clone(),
            cancellation.clone(),
        );
        let reader = self.reader.clone();
        let key = pubkey_used_key(public_key);
        spawn_fact_check(
            EligibilityFact::PublicKeyUsed,
            async move { reader.storage_bool(key).await },
            sender,
            cancellation.clone(),
        );

        let mut has_existing_reservation = None;
        let mut deposits_enabled = None;
        let mut pubkey_used = None;
        for _ in EligibilityFact::ALL {
            let Some((fact, outcome)) = receiver.recv().await else {
                // Every sender is gone without reporting, so a fact task died.
                let fact = [
                    (EligibilityFact::ExistingReservation, has_existing_reservation),
                    (EligibilityFact::DepositsEnabled, deposits_enabled),
                    (EligibilityFact::PublicKeyUsed, pubkey_used),
                ]
                .into_iter()
                .find_map(|(fact, value)| value.is_none().then_some(fact))
                .unwrap_or(EligibilityFact::PublicKeyUsed);
                return Err(DepositError::Eligibility {
                    fact,
                    source: anyhow::anyhow!("Eligibility task ended without a result"),
                });
            };
            let value = outcome.map_err(|source| DepositError::Eligibility { fact, source })?;
            debug!(%fact, value, "Eligibility fact read");
            match fact {
                EligibilityFact::ExistingReservation => has_existing_reservation = Some(value),
                EligibilityFact::DepositsEnabled => deposits_enabled = Some(value),
                EligibilityFact::PublicKeyUsed => pubkey_used = Some(value),
            }
        }

        Ok(DepositReserveResult {
            has_existing_reservation: has_existing_reservation.unwrap_or_default(),
            deposits_enabled: deposits_enabled.unwrap_or_default(),
            pubkey_used: pubkey_used.unwrap_or_default(),
            ..Default::default()
        })
    }

    fn build_deposit_data(&self, keystore: &Keystore) -> Result<DepositData, DepositError> {
        let derived_public_key = keystore
            .private_key
            .public_key()
            .map_err(|err| DepositError::Hashing(format!("deriving public key: {err}")))?;
        if derived_public_key != keystore.public_key {
            return Err(DepositError::Hashing(format!(
                "public key {} does not belong to the generated signing key",
                keystore.public_key
            )));
        }

        if self.config.uses_placeholder_withdrawal_key() {
            warn!("Building withdrawal credentials from the placeholder withdrawal public key");
        }
        let withdrawal_credentials =
            bls_withdrawal_credentials(&self.config.withdrawal_public_key);

        let mut deposit_data = DepositData::new(
            keystore.public_key.clone(),
            withdrawal_credentials,
            FULL_DEPOSIT_AMOUNT,
        );
        let signing_root = deposit_data.signing_root(self.config.genesis_fork_version);
        let signature = keystore.private_key.sign(signing_root.as_slice())?;
        if !signature.verify(&keystore.public_key, signing_root.as_slice())? {
            return Err(DepositError::Signing(BLSError::InvalidSignature));
        }
        deposit_data.signature = signature;
        debug!(public_key = %keystore.public_key, %signing_root, "Signed deposit data");
        Ok(deposit_data)
    }
}

fn spawn_fact_check<F>(
    fact: EligibilityFact,
    read: F,
    sender: mpsc::Sender<FactOutcome>,
    cancellation: CancellationToken,
) where
    F: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = tokio::select! {
            _ = cancellation.cancelled() => {
                debug!(%fact, "Eligibility read cancelled");
                return;
            }
            outcome = read => outcome,
        };
        // Capacity covers every fact, so this never waits on an abandoned receiver.
        let _ = sender.send((fact, outcome)).await;
    });
}
