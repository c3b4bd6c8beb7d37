//! # Publish Errors
//!
//! Errors from a publish attempt. Note what is NOT here: a strategy that
//! simply has nothing to contribute declines with
//! `PublishOutcome::declined()`, it does not error. Errors are reserved for
//! attempts that committed to a path and then could not complete it.

use thiserror::Error;

use wallet_bus::BusError;
use wallet_types::TransactionId;

/// Errors from the publish pipeline and its strategies.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A bus action failed underneath a committed strategy.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Batch publish could not resolve its representative transaction.
    #[error("unknown batch transaction {transaction_id}")]
    UnknownBatchTransaction { transaction_id: TransactionId },

    /// The relay accepted a submission but never produced a hash. A missing
    /// hash after commitment is a failure, unlike a pre-commitment decline.
    #[error("relay submission {submission_id} returned no transaction hash")]
    MissingTransactionHash { submission_id: uuid::Uuid },

    /// The relay acknowledged without a usable submission id.
    #[error("relay returned no submission id")]
    MissingSubmissionId,
}
