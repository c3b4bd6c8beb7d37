//! # Transaction Controller (Engine)
//!
//! Owns the transaction records and their status machine, emits every
//! lifecycle event, reserves nonces, and drives the publish pipeline when a
//! transaction is submitted. A pipeline decline falls back to the default
//! raw broadcast through the network controller; a pipeline error marks the
//! record failed.
//!
//! ## Status Machine
//!
//! ```text
//! Unapproved ──→ Approved ──→ Submitted ──→ Confirmed
//!     │                           │
//!     │                           ├──→ Dropped
//!     └──→ Rejected               └──→ Failed
//! ```

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use wallet_bus::{
    ActionHandler, ActionName, ActionResponse, BusError, WalletAction, WalletEvent,
    RestrictedMessenger,
};
use wallet_controllers::{Controller, ControllerInit, InitRequest, InitResult, RegistryError};
use wallet_publish::{BatchItem, PublishError, PublishPipeline, PublishRequest};
use wallet_types::{
    Address, ControllerName, NetworkClientId, TransactionId, TransactionRecord, TransactionStatus,
    TransactionType, TxHash, TxParams,
};

use crate::config::RuntimeConfig;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("unknown transaction {transaction_id}")]
    UnknownTransaction { transaction_id: TransactionId },

    /// The operation is not valid from the record's current status.
    #[error("cannot {operation} transaction {transaction_id} in status {status:?}")]
    InvalidStatus {
        transaction_id: TransactionId,
        status: TransactionStatus,
        operation: &'static str,
    },

    /// The default broadcast path returned no hash.
    #[error("raw broadcast returned no transaction hash")]
    BroadcastFailed,

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

pub struct TransactionEngine {
    messenger: RestrictedMessenger,
    network_client_id: NetworkClientId,
    records: Mutex<HashMap<TransactionId, TransactionRecord>>,
    next_nonces: Mutex<HashMap<(Address, NetworkClientId), u64>>,
    /// Installed after init by the runtime wiring; submissions before that
    /// go straight to the default broadcast.
    pipeline: Mutex<Option<Arc<PublishPipeline>>>,
}

impl TransactionEngine {
    /// Install the publish pipeline hook set.
    pub fn install_pipeline(&self, pipeline: Arc<PublishPipeline>) {
        *self.pipeline.lock() = Some(pipeline);
    }

    /// Look up a record.
    #[must_use]
    pub fn get(&self, transaction_id: TransactionId) -> Option<TransactionRecord> {
        self.records.lock().get(&transaction_id).cloned()
    }

    /// Create a fresh unapproved record on the selected network.
    pub async fn add_transaction(
        &self,
        tx_params: TxParams,
        tx_type: TransactionType,
        selected_gas_fee_token: Option<Address>,
    ) -> Result<TransactionRecord, TransactionError> {
        let chain_id = match self.messenger.call(WalletAction::GetCurrentChainId).await? {
            ActionResponse::ChainId(chain_id) => chain_id,
            other => {
                return Err(BusError::UnexpectedResponse {
                    expected: "ChainId",
                    got: other.variant_name(),
                }
                .into())
            }
        };
        let mut record =
            TransactionRecord::new(chain_id, self.network_client_id.clone(), tx_params, tx_type);
        record.selected_gas_fee_token = selected_gas_fee_token;
        self.records.lock().insert(record.id, record.clone());
        info!(transaction_id = %record.id, %chain_id, "Added unapproved transaction");
        self.publish_event(&WalletEvent::UnapprovedTransactionAdded(record.clone()));
        Ok(record)
    }

    /// Approve an unapproved transaction.
    pub fn approve(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let record = self.transition(
            transaction_id,
            &[TransactionStatus::Unapproved],
            TransactionStatus::Approved,
            "approve",
        )?;
        self.publish_event(&WalletEvent::TransactionApproved(record));
        Ok(())
    }

    /// Reject an unapproved transaction.
    pub fn reject(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let record = self.transition(
            transaction_id,
            &[TransactionStatus::Unapproved],
            TransactionStatus::Rejected,
            "reject",
        )?;
        self.publish_event(&WalletEvent::TransactionRejected(record));
        Ok(())
    }

    /// Sign and publish an approved transaction.
    ///
    /// The pipeline is consulted first; a decline falls back to the raw
    /// broadcast. Errors mark the record failed before propagating.
    pub async fn submit(&self, transaction_id: TransactionId) -> Result<TxHash, TransactionError> {
        let record = self.expect_status(transaction_id, &[TransactionStatus::Approved], "submit")?;

        match self.sign_and_publish(&record).await {
            Ok(hash) => {
                self.finish_submission(transaction_id, hash.clone());
                Ok(hash)
            }
            Err(error) => {
                warn!(%transaction_id, %error, "Submission failed");
                self.mark_failed(transaction_id, error.to_string());
                Err(error)
            }
        }
    }

    /// Sign and publish an approved batch atomically, falling back to
    /// per-item raw broadcast when the pipeline declines.
    pub async fn submit_batch(
        &self,
        transaction_ids: &[TransactionId],
    ) -> Result<Vec<TxHash>, TransactionError> {
        let mut items = Vec::with_capacity(transaction_ids.len());
        for &transaction_id in transaction_ids {
            self.expect_status(transaction_id, &[TransactionStatus::Approved], "submit")?;
            items.push(BatchItem {
                transaction_id,
                signed_transaction: self.sign(transaction_id).await?,
            });
        }

        let pipeline = self.pipeline.lock().clone();
        let submission = match &pipeline {
            Some(pipeline) => pipeline.publish_batch(&items).await?,
            None => None,
        };

        let mut hashes = Vec::with_capacity(items.len());
        match submission {
            Some(submission) => {
                // Relay path: hashes come back in batch order.
                for (index, item) in items.iter().enumerate() {
                    let hash = submission
                        .transaction_hashes
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| super::derive_tx_hash(&item.signed_transaction));
                    self.finish_submission(item.transaction_id, hash.clone());
                    hashes.push(hash);
                }
            }
            None => {
                // Decline: every item goes through the default path.
                for item in &items {
                    let hash = self.broadcast_raw(&item.signed_transaction).await?;
                    self.finish_submission(item.transaction_id, hash.clone());
                    hashes.push(hash);
                }
            }
        }
        Ok(hashes)
    }

    /// Mark a submitted transaction confirmed.
    pub fn confirm(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let record = self.transition(
            transaction_id,
            &[TransactionStatus::Submitted],
            TransactionStatus::Confirmed,
            "confirm",
        )?;
        self.publish_event(&WalletEvent::TransactionConfirmed(record));
        Ok(())
    }

    /// Mark a submitted transaction dropped.
    pub fn drop_transaction(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let record = self.transition(
            transaction_id,
            &[TransactionStatus::Submitted],
            TransactionStatus::Dropped,
            "drop",
        )?;
        self.publish_event(&WalletEvent::TransactionDropped(record));
        Ok(())
    }

    /// Mark a transaction failed with an error description.
    pub fn fail(
        &self,
        transaction_id: TransactionId,
        error: impl Into<String>,
    ) -> Result<(), TransactionError> {
        let error = error.into();
        self.expect_status(
            transaction_id,
            &[TransactionStatus::Approved, TransactionStatus::Submitted],
            "fail",
        )?;
        self.mark_failed(transaction_id, error);
        Ok(())
    }

    /// Record a post-confirmation balance refresh.
    pub fn post_balance_update(
        &self,
        transaction_id: TransactionId,
        balance: u128,
    ) -> Result<(), TransactionError> {
        let record = self.expect_status(
            transaction_id,
            &[TransactionStatus::Confirmed],
            "update balance for",
        )?;
        self.publish_event(&WalletEvent::PostTransactionBalanceUpdated {
            transaction: record,
            balance,
        });
        Ok(())
    }

    /// Link a swap trade transaction to its approval.
    pub fn link_swap(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        let record = self.record(transaction_id)?;
        self.publish_event(&WalletEvent::TransactionNewSwap(record));
        Ok(())
    }

    async fn sign(&self, transaction_id: TransactionId) -> Result<String, TransactionError> {
        Ok(self
            .messenger
            .call(WalletAction::SignTransaction { transaction_id })
            .await?
            .into_signed_transaction()?)
    }

    async fn sign_and_publish(
        &self,
        record: &TransactionRecord,
    ) -> Result<TxHash, TransactionError> {
        let signed_transaction = self.sign(record.id).await?;

        let pipeline = self.pipeline.lock().clone();
        if let Some(pipeline) = pipeline {
            let outcome = pipeline
                .publish(&PublishRequest {
                    transaction: record.clone(),
                    signed_transaction: signed_transaction.clone(),
                })
                .await?;
            if let Some(hash) = outcome.transaction_hash {
                return Ok(hash);
            }
        }

        self.broadcast_raw(&signed_transaction).await
    }

    async fn broadcast_raw(&self, signed_transaction: &str) -> Result<TxHash, TransactionError> {
        self.messenger
            .call(WalletAction::SubmitRawTransaction {
                network_client_id: self.network_client_id.clone(),
                signed_transaction: signed_transaction.to_string(),
            })
            .await?
            .into_transaction_hash()?
            .ok_or(TransactionError::BroadcastFailed)
    }

    fn finish_submission(&self, transaction_id: TransactionId, hash: TxHash) {
        let updated = {
            let mut records = self.records.lock();
            records.get_mut(&transaction_id).map(|record| {
                record.status = TransactionStatus::Submitted;
                record.hash = Some(hash);
                record.clone()
            })
        };
        if let Some(record) = updated {
            let key = (record.tx_params.from.clone(), record.network_client_id.clone());
            *self.next_nonces.lock().entry(key).or_insert(0) += 1;
            info!(%transaction_id, hash = %record.hash.as_ref().map_or("", |h| h.as_str()), "Transaction submitted");
            self.publish_event(&WalletEvent::TransactionSubmitted(record));
        }
    }

    fn mark_failed(&self, transaction_id: TransactionId, error: String) {
        let updated = {
            let mut records = self.records.lock();
            records.get_mut(&transaction_id).map(|record| {
                record.status = TransactionStatus::Failed;
                record.error = Some(error.clone());
                record.clone()
            })
        };
        if let Some(record) = updated {
            self.publish_event(&WalletEvent::TransactionFailed {
                transaction: record,
                error,
            });
        }
    }

    fn record(&self, transaction_id: TransactionId) -> Result<TransactionRecord, TransactionError> {
        self.records
            .lock()
            .get(&transaction_id)
            .cloned()
            .ok_or(TransactionError::UnknownTransaction { transaction_id })
    }

    fn expect_status(
        &self,
        transaction_id: TransactionId,
        expected: &[TransactionStatus],
        operation: &'static str,
    ) -> Result<TransactionRecord, TransactionError> {
        let record = self.record(transaction_id)?;
        if !expected.contains(&record.status) {
            return Err(TransactionError::InvalidStatus {
                transaction_id,
                status: record.status,
                operation,
            });
        }
        Ok(record)
    }

    fn transition(
        &self,
        transaction_id: TransactionId,
        expected: &[TransactionStatus],
        to: TransactionStatus,
        operation: &'static str,
    ) -> Result<TransactionRecord, TransactionError> {
        self.expect_status(transaction_id, expected, operation)?;
        let mut records = self.records.lock();
        let record = records
            .get_mut(&transaction_id)
            .ok_or(TransactionError::UnknownTransaction { transaction_id })?;
        record.status = to;
        Ok(record.clone())
    }

    /// Fan-out failures cannot happen (publishing own events is always
    /// granted), but the result is surfaced in logs rather than ignored.
    fn publish_event(&self, event: &WalletEvent) {
        if let Err(error) = self.messenger.publish(event) {
            warn!(%error, "Lifecycle event publish failed");
        }
    }

    fn handle(self: Arc<Self>, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::GetTransactionById { transaction_id } => Ok(ActionResponse::Transaction(
                self.get(transaction_id).map(Box::new),
            )),
            WalletAction::GetNextNonce {
                address,
                network_client_id,
            } => Ok(ActionResponse::Nonce(
                self.next_nonces
                    .lock()
                    .get(&(address, network_client_id))
                    .copied()
                    .unwrap_or(0),
            )),
            other => Err(BusError::handler(
                other.name(),
                "not handled by the transaction controller",
            )),
        }
    }
}

impl Controller for TransactionEngine {
    fn name(&self) -> ControllerName {
        ControllerName::Transactions
    }

    fn state_snapshot(&self) -> Option<serde_json::Value> {
        let records = self.records.lock();
        let mut all: Vec<&TransactionRecord> = records.values().collect();
        all.sort_by_key(|record| record.created_at);
        serde_json::to_value(all).ok()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Curated external surface of the engine. Wiring code and the UI layer get
/// this, never the raw controller.
pub struct TransactionsApi {
    engine: Arc<TransactionEngine>,
}

impl TransactionsApi {
    pub fn install_pipeline(&self, pipeline: Arc<PublishPipeline>) {
        self.engine.install_pipeline(pipeline);
    }

    #[must_use]
    pub fn get(&self, transaction_id: TransactionId) -> Option<TransactionRecord> {
        self.engine.get(transaction_id)
    }

    pub async fn add_transaction(
        &self,
        tx_params: TxParams,
        tx_type: TransactionType,
        selected_gas_fee_token: Option<Address>,
    ) -> Result<TransactionRecord, TransactionError> {
        self.engine
            .add_transaction(tx_params, tx_type, selected_gas_fee_token)
            .await
    }

    pub fn approve(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        self.engine.approve(transaction_id)
    }

    pub fn reject(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        self.engine.reject(transaction_id)
    }

    pub async fn submit(&self, transaction_id: TransactionId) -> Result<TxHash, TransactionError> {
        self.engine.submit(transaction_id).await
    }

    pub async fn submit_batch(
        &self,
        transaction_ids: &[TransactionId],
    ) -> Result<Vec<TxHash>, TransactionError> {
        self.engine.submit_batch(transaction_ids).await
    }

    pub fn confirm(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        self.engine.confirm(transaction_id)
    }

    pub fn drop_transaction(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        self.engine.drop_transaction(transaction_id)
    }

    pub fn fail(
        &self,
        transaction_id: TransactionId,
        error: impl Into<String>,
    ) -> Result<(), TransactionError> {
        self.engine.fail(transaction_id, error)
    }

    pub fn post_balance_update(
        &self,
        transaction_id: TransactionId,
        balance: u128,
    ) -> Result<(), TransactionError> {
        self.engine.post_balance_update(transaction_id, balance)
    }

    pub fn link_swap(&self, transaction_id: TransactionId) -> Result<(), TransactionError> {
        self.engine.link_swap(transaction_id)
    }
}

pub struct TransactionsInit {
    pub config: RuntimeConfig,
}

impl ControllerInit for TransactionsInit {
    fn name(&self) -> ControllerName {
        ControllerName::Transactions
    }

    fn declared_dependencies(&self) -> &'static [ControllerName] {
        // The engine's action handlers (signing, broadcast) must exist before
        // the first submission, so their owners are initialized eagerly.
        &[ControllerName::Network, ControllerName::Accounts]
    }

    fn persisted_state_key(&self) -> Option<&'static str> {
        Some("TransactionController")
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        request.registry.resolve(ControllerName::Network)?;
        request.registry.resolve(ControllerName::Accounts)?;

        let mut records = HashMap::new();
        if !request.persisted_state.is_null() {
            match serde_json::from_value::<Vec<TransactionRecord>>(request.persisted_state.clone())
            {
                Ok(persisted) => {
                    for record in persisted {
                        records.insert(record.id, record);
                    }
                }
                Err(error) => {
                    warn!(%error, "Discarding malformed persisted transactions");
                }
            }
        }

        let engine = Arc::new(TransactionEngine {
            messenger: request.messenger.clone(),
            network_client_id: self.config.network_client_id.clone(),
            records: Mutex::new(records),
            next_nonces: Mutex::new(HashMap::new()),
            pipeline: Mutex::new(None),
        });

        let handler: ActionHandler = {
            let engine = Arc::clone(&engine);
            Arc::new(
                move |action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                    let engine = Arc::clone(&engine);
                    Box::pin(async move { engine.handle(action) })
                },
            )
        };
        for name in [ActionName::GetTransactionById, ActionName::GetNextNonce] {
            request
                .messenger
                .register_action(name, Arc::clone(&handler))?;
        }

        let api = Arc::new(TransactionsApi {
            engine: Arc::clone(&engine),
        });
        Ok(InitResult {
            controller: engine,
            api: Some(api),
            persisted_state_key: Some("TransactionController"),
            mem_state_key: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_bus::{CapabilityGrant, Messenger};
    use wallet_types::ChainId;

    fn engine_with_bus() -> (Arc<TransactionEngine>, Arc<Messenger>) {
        let bus = Arc::new(Messenger::new());
        let engine = Arc::new(TransactionEngine {
            messenger: bus.restricted(CapabilityGrant {
                component: ControllerName::Transactions,
                actions: &[
                    ActionName::SignTransaction,
                    ActionName::SubmitRawTransaction,
                    ActionName::GetCurrentChainId,
                ],
                events: &[],
            }),
            network_client_id: NetworkClientId::new("mainnet"),
            records: Mutex::new(HashMap::new()),
            next_nonces: Mutex::new(HashMap::new()),
            pipeline: Mutex::new(None),
        });
        (engine, bus)
    }

    fn seed(engine: &TransactionEngine, status: TransactionStatus) -> TransactionId {
        let mut record = TransactionRecord::new(
            ChainId::MAINNET,
            NetworkClientId::new("mainnet"),
            TxParams {
                from: Address::new("0xaa"),
                to: Some(Address::new("0xbb")),
                value: 1,
                data: "0x".into(),
                nonce: None,
                max_fee_per_gas: Some(1),
                gas_price: None,
            },
            TransactionType::Transfer,
        );
        record.status = status;
        let id = record.id;
        engine.records.lock().insert(id, record);
        id
    }

    #[test]
    fn test_approve_requires_unapproved() {
        let (engine, _bus) = engine_with_bus();
        let id = seed(&engine, TransactionStatus::Submitted);
        let err = engine.approve(id).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidStatus { .. }));
    }

    #[test]
    fn test_reject_is_terminal() {
        let (engine, _bus) = engine_with_bus();
        let id = seed(&engine, TransactionStatus::Unapproved);
        engine.reject(id).unwrap();
        assert_eq!(
            engine.get(id).unwrap().status,
            TransactionStatus::Rejected
        );
        assert!(engine.approve(id).is_err());
    }

    #[test]
    fn test_confirm_requires_submitted() {
        let (engine, _bus) = engine_with_bus();
        let id = seed(&engine, TransactionStatus::Approved);
        assert!(engine.confirm(id).is_err());
    }

    #[test]
    fn test_unknown_transaction() {
        let (engine, _bus) = engine_with_bus();
        let err = engine.approve(TransactionId::generate()).unwrap_err();
        assert!(matches!(err, TransactionError::UnknownTransaction { .. }));
    }

    #[test]
    fn test_nonce_increments_on_submission() {
        let (engine, _bus) = engine_with_bus();
        let id = seed(&engine, TransactionStatus::Approved);
        let key = (Address::new("0xaa"), NetworkClientId::new("mainnet"));
        assert!(engine.next_nonces.lock().get(&key).is_none());
        engine.finish_submission(id, TxHash::new("0x01"));
        assert_eq!(engine.next_nonces.lock().get(&key), Some(&1));
    }

    #[test]
    fn test_snapshot_is_ordered_by_creation() {
        let (engine, _bus) = engine_with_bus();
        seed(&engine, TransactionStatus::Unapproved);
        seed(&engine, TransactionStatus::Unapproved);
        let snapshot = engine.state_snapshot().unwrap();
        let restored: Vec<TransactionRecord> = serde_json::from_value(snapshot).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored[0].created_at <= restored[1].created_at);
    }
}
