//! # Publish Pipeline
//!
//! Runs the configured strategies in order against one publish request and
//! returns the first submitted outcome, or a decline when every strategy
//! passes. Also hosts batch publish, which is all-or-nothing: either the
//! whole batch goes through the relay in one bundle, or the engine
//! publishes each item through its default path.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use wallet_bus::{RestrictedMessenger, WalletAction};
use wallet_types::{TransactionId, TxHash};

use crate::delegated::DelegatedStrategy;
use crate::error::PublishError;
use crate::nonce::NonceLockPool;
use crate::smart::{is_relayable, SmartTransactionStrategy};
use crate::strategy::{PublishOutcome, PublishRequest, PublishStrategy};

/// One member of an atomic batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub transaction_id: TransactionId,
    /// Signed transaction as a hex string.
    pub signed_transaction: String,
}

/// Result of a batch that went through the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSubmission {
    pub submission_id: Uuid,
    /// Per-item hashes in batch order; empty when the relay reported none.
    pub transaction_hashes: Vec<TxHash>,
}

pub struct PublishPipeline {
    messenger: RestrictedMessenger,
    strategies: Vec<Box<dyn PublishStrategy>>,
}

impl PublishPipeline {
    /// Build the standard pipeline: delegated first, then smart transaction.
    #[must_use]
    pub fn new(messenger: RestrictedMessenger, nonce_locks: Arc<NonceLockPool>) -> Self {
        let strategies: Vec<Box<dyn PublishStrategy>> = vec![
            Box::new(DelegatedStrategy::new(messenger.clone(), nonce_locks)),
            Box::new(SmartTransactionStrategy::new(messenger.clone())),
        ];
        Self {
            messenger,
            strategies,
        }
    }

    /// Build a pipeline with explicit strategies.
    #[must_use]
    pub fn with_strategies(
        messenger: RestrictedMessenger,
        strategies: Vec<Box<dyn PublishStrategy>>,
    ) -> Self {
        Self {
            messenger,
            strategies,
        }
    }

    /// Run one publish attempt. The first strategy to produce a hash wins;
    /// a pipeline-wide decline defers to the engine's default broadcast.
    ///
    /// # Errors
    ///
    /// Strategy execution errors propagate; the engine marks the record
    /// failed. A decline is `Ok`, never an error.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        for strategy in &self.strategies {
            let outcome = strategy.publish(request).await?;
            if outcome.is_submitted() {
                info!(
                    transaction_id = %request.transaction.id,
                    strategy = strategy.name(),
                    "Publish strategy claimed transaction"
                );
                return Ok(outcome);
            }
            debug!(
                transaction_id = %request.transaction.id,
                strategy = strategy.name(),
                "Strategy declined"
            );
        }
        Ok(PublishOutcome::declined())
    }

    /// Publish an atomic batch through the relay, or decline.
    ///
    /// Eligibility is resolved from the LAST item's record: its chain, type,
    /// and flags stand in for the whole batch. This mirrors long-standing
    /// upstream behavior and is kept as-is.
    ///
    /// # Errors
    ///
    /// `UnknownBatchTransaction` when the representative record cannot be
    /// resolved. This fails fast rather than silently falling back: an
    /// unresolvable batch member means the caller and engine disagree about
    /// what is being published.
    pub async fn publish_batch(
        &self,
        items: &[BatchItem],
    ) -> Result<Option<BatchSubmission>, PublishError> {
        let Some(representative) = items.last() else {
            warn!("Empty batch publish request");
            return Ok(None);
        };

        let record = self
            .messenger
            .call(WalletAction::GetTransactionById {
                transaction_id: representative.transaction_id,
            })
            .await?
            .into_transaction()?
            .ok_or(PublishError::UnknownBatchTransaction {
                transaction_id: representative.transaction_id,
            })?;

        if !is_relayable(&record) {
            debug!(transaction_id = %record.id, "Batch representative not relayable, declining");
            return Ok(None);
        }
        let flags = self
            .messenger
            .call(WalletAction::GetFeatureFlags)
            .await?
            .into_feature_flags()?;
        if !flags.is_smart_transaction(record.chain_id) {
            debug!(transaction_id = %record.id, "Batch not smart-eligible, declining");
            return Ok(None);
        }

        // One relay call for the whole batch; item nonces were pinned by the
        // engine, so no nonce pre-read happens here.
        let submission = self
            .messenger
            .call(WalletAction::SubmitRelayBundle {
                chain_id: record.chain_id,
                signed_transactions: items
                    .iter()
                    .map(|item| item.signed_transaction.clone())
                    .collect(),
                nonce: None,
            })
            .await?
            .into_relay_submission()?;
        info!(
            submission_id = %submission.submission_id,
            items = items.len(),
            "Submitted batch to relay"
        );
        Ok(Some(BatchSubmission {
            submission_id: submission.submission_id,
            transaction_hashes: submission.tx_hashes,
        }))
    }
}
