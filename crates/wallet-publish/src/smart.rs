//! # Smart Transaction Strategy
//!
//! Routes a transaction through the smart-transaction relay. The gate is:
//!
//! ```text
//! is_smart_transaction && (send_bundle_supported || no gas-fee token selected)
//! ```
//!
//! where `is_smart_transaction` means the user preference is on and the
//! chain is supported. Swap-and-send, swap-approval, and bridge-approval
//! transactions are never relayed, nor are legacy (pre-EIP-1559) envelopes.
//!
//! The fee quote is advisory: a quote failure logs and declines so the
//! transaction still reaches the chain through the default path. A missing
//! hash after submission, by contrast, is a real error; at that point the
//! relay owns the transaction and silent fallback would double-spend.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use wallet_bus::{RestrictedMessenger, WalletAction};
use wallet_types::{TransactionRecord, TransactionType};

use crate::error::PublishError;
use crate::strategy::{PublishOutcome, PublishRequest, PublishStrategy};

/// Transaction types the relay refuses.
fn is_unsupported_type(tx_type: TransactionType) -> bool {
    matches!(
        tx_type,
        TransactionType::SwapAndSend
            | TransactionType::SwapApproval
            | TransactionType::BridgeApproval
    )
}

/// Type- and envelope-level eligibility, shared with batch publish.
#[must_use]
pub(crate) fn is_relayable(record: &TransactionRecord) -> bool {
    !is_unsupported_type(record.tx_type) && !record.tx_params.is_legacy()
}

pub struct SmartTransactionStrategy {
    messenger: RestrictedMessenger,
}

impl SmartTransactionStrategy {
    #[must_use]
    pub fn new(messenger: RestrictedMessenger) -> Self {
        Self { messenger }
    }

    /// Probe send-bundle support, failing closed.
    pub(crate) async fn send_bundle_supported(&self, record: &TransactionRecord) -> bool {
        match self
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
        }
    }
}

#[async_trait]
impl PublishStrategy for SmartTransactionStrategy {
    fn name(&self) -> &'static str {
        "smart-transaction"
    }

    async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        let record = &request.transaction;

        if !is_relayable(record) {
            debug!(transaction_id = %record.id, tx_type = ?record.tx_type, "Transaction type not relayable");
            return Ok(PublishOutcome::declined());
        }

        // Flags are re-fetched per attempt; they are eventually-consistent
        // snapshots, not cacheable configuration.
        let flags = self
            .messenger
            .call(WalletAction::GetFeatureFlags)
            .await?
            .into_feature_flags()?;
        if !flags.is_smart_transaction(record.chain_id) {
            return Ok(PublishOutcome::declined());
        }

        if record.selected_gas_fee_token.is_some() && !self.send_bundle_supported(record).await {
            debug!(
                transaction_id = %record.id,
                "Gas-fee token selected without bundle support, skipping relay"
            );
            return Ok(PublishOutcome::declined());
        }

        // Advisory: the transaction must still reach the chain when the fee
        // endpoint is down, so a quote failure declines instead of erroring.
        let fee_quote = match self
            .messenger
            .call(WalletAction::GetRelayFeeQuote {
                chain_id: record.chain_id,
                tx_params: record.tx_params.clone(),
            })
            .await
            .and_then(|response| response.into_fee_quote())
        {
            Ok(quote) => quote,
            Err(error) => {
                warn!(transaction_id = %record.id, %error, "Fee quote failed, declining relay");
                return Ok(PublishOutcome::declined());
            }
        };

        let submission = self
            .messenger
            .call(WalletAction::SubmitRelayTransaction {
                chain_id: record.chain_id,
                signed_transaction: request.signed_transaction.clone(),
                fee_quote,
            })
            .await?
            .into_relay_submission()?;
        if submission.submission_id.is_nil() {
            return Err(PublishError::MissingSubmissionId);
        }
        info!(
            transaction_id = %record.id,
            submission_id = %submission.submission_id,
            "Submitted to smart-transaction relay"
        );

        if flags.return_tx_hash_asap {
            if let Some(hash) = submission.tx_hash {
                return Ok(PublishOutcome::submitted(
                    hash,
                    Some(submission.submission_id),
                ));
            }
        }

        let hash = self
            .messenger
            .call(WalletAction::WaitForRelayTransactionHash {
                submission_id: submission.submission_id,
            })
            .await?
            .into_transaction_hash()?
            .ok_or(PublishError::MissingTransactionHash {
                submission_id: submission.submission_id,
            })?;
        Ok(PublishOutcome::submitted(
            hash,
            Some(submission.submission_id),
        ))
    }
}
