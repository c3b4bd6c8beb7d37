//! # Delegated Publish Strategy
//!
//! Routes a transaction through the account-abstraction relay as a
//! single-item bundle. Eligible only when the sending account supports
//! atomic batching AND the relay accepts send-bundle submissions for the
//! chain; the send-bundle probe fails closed, so a probe error reads as
//! "not supported" rather than aborting the attempt.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use wallet_bus::{RestrictedMessenger, WalletAction};

use crate::error::PublishError;
use crate::nonce::NonceLockPool;
use crate::strategy::{PublishOutcome, PublishRequest, PublishStrategy};

pub struct DelegatedStrategy {
    messenger: RestrictedMessenger,
    nonce_locks: Arc<NonceLockPool>,
}

impl DelegatedStrategy {
    #[must_use]
    pub fn new(messenger: RestrictedMessenger, nonce_locks: Arc<NonceLockPool>) -> Self {
        Self {
            messenger,
            nonce_locks,
        }
    }
}

#[async_trait]
impl PublishStrategy for DelegatedStrategy {
    fn name(&self) -> &'static str {
        "delegated"
    }

    async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        let record = &request.transaction;
        let from = record.tx_params.from.clone();

        let atomic_supported = self
            .messenger
            .call(WalletAction::IsAtomicBatchSupported {
                address: from.clone(),
                chain_id: record.chain_id,
            })
            .await?
            .into_supported()?;
        if !atomic_supported {
            debug!(transaction_id = %record.id, "Account does not support atomic batching");
            return Ok(PublishOutcome::declined());
        }

        // Fails closed: an unreachable relay means no delegated path today.
        let bundle_supported = match self
            .messenger
            .call(WalletAction::IsSendBundleSupported {
                chain_id: record.chain_id,
            })
            .await
            .and_then(|response| response.into_supported())
        {
            Ok(supported) => supported,
            Err(error) => {
                warn!(transaction_id = %record.id, %error, "Send-bundle probe failed, treating as unsupported");
                false
            }
        };
        if !bundle_supported {
            return Ok(PublishOutcome::declined());
        }

        // The lock covers only the nonce read; it must not be held across
        // the relay call.
        let nonce = {
            let _guard = self
                .nonce_locks
                .acquire(&from, &record.network_client_id)
                .await;
            self.messenger
                .call(WalletAction::GetNextNonce {
                    address: from,
                    network_client_id: record.network_client_id.clone(),
                })
                .await?
                .into_nonce()?
        };

        let submission = self
            .messenger
            .call(WalletAction::SubmitRelayBundle {
                chain_id: record.chain_id,
                signed_transactions: vec![request.signed_transaction.clone()],
                nonce: Some(nonce),
            })
            .await?
            .into_relay_submission()?;

        let hash = submission
            .tx_hash
            .or_else(|| submission.tx_hashes.into_iter().next());
        match hash {
            Some(transaction_hash) => Ok(PublishOutcome::submitted(
                transaction_hash,
                Some(submission.submission_id),
            )),
            None => {
                // The relay accepted the bundle without a hash; fall through
                // to the next strategy. One consult per attempt, no retry.
                warn!(
                    transaction_id = %record.id,
                    submission_id = %submission.submission_id,
                    "Delegated submission returned no hash, falling through"
                );
                Ok(PublishOutcome::declined())
            }
        }
    }
}
