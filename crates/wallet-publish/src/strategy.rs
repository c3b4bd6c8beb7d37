//! # Publish Strategy Contract
//!
//! A strategy inspects one approved, signed transaction and either takes
//! responsibility for getting it on chain (returning a hash) or declines.
//! Declining is cheap and expected; the pipeline falls through to the next
//! strategy and ultimately to the engine's default broadcast.

use async_trait::async_trait;
use uuid::Uuid;

use wallet_types::{TransactionRecord, TxHash};

use crate::error::PublishError;

/// One transaction handed to the pipeline: the engine-owned record plus the
/// raw signed bytes the engine produced for it.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub transaction: TransactionRecord,
    /// Signed transaction as a hex string, ready for broadcast.
    pub signed_transaction: String,
}

/// Result of a publish attempt.
///
/// `transaction_hash: None` is the decline signal: no strategy claimed the
/// transaction, and the engine broadcasts through its default path. It is
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub transaction_hash: Option<TxHash>,
    /// Relay submission id, when a relay strategy won.
    pub submission_id: Option<Uuid>,
}

impl PublishOutcome {
    /// No strategy claimed the transaction.
    #[must_use]
    pub fn declined() -> Self {
        Self {
            transaction_hash: None,
            submission_id: None,
        }
    }

    /// A strategy produced a hash.
    #[must_use]
    pub fn submitted(transaction_hash: TxHash, submission_id: Option<Uuid>) -> Self {
        Self {
            transaction_hash: Some(transaction_hash),
            submission_id,
        }
    }

    /// Whether the pipeline produced a hash.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.transaction_hash.is_some()
    }
}

/// One publish strategy. Tried in pipeline order; the first submitted
/// outcome wins.
#[async_trait]
pub trait PublishStrategy: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Attempt to publish. Eligibility checks happen inside: an ineligible
    /// transaction declines rather than erroring. One consult per attempt,
    /// no internal retry.
    async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError>;
}
