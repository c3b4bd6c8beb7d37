//! # Wallet Publish - Transaction Publish Pipeline
//!
//! Decides how an approved, signed transaction reaches the chain. Strategies
//! are tried in a fixed order; the first to produce a hash wins, and a
//! pipeline that produces no hash is a decline, deferring to the engine's
//! own broadcast path.
//!
//! ## Publish Attempt
//!
//! ```text
//!  Start ──→ TryDelegated ──→ TrySmartTransaction ──→ DefaultBroadcast
//!               │ hash             │ hash                   │
//!               ▼                  ▼                        ▼
//!              Done               Done              PublishOutcome::declined
//! ```
//!
//! A decline (`transaction_hash: None`) is a first-class outcome, never an
//! error. Strategy execution errors propagate to the engine, which marks
//! the record failed.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod delegated;
pub mod error;
pub mod nonce;
pub mod pipeline;
pub mod smart;
pub mod strategy;

// Re-export main types
pub use delegated::DelegatedStrategy;
pub use error::PublishError;
pub use nonce::{NonceGuard, NonceLockPool};
pub use pipeline::{BatchItem, BatchSubmission, PublishPipeline};
pub use smart::SmartTransactionStrategy;
pub use strategy::{PublishOutcome, PublishRequest, PublishStrategy};
