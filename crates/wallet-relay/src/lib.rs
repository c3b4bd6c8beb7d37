//! # Wallet Relay - Transaction Event Relay
//!
//! Subscribes once at startup to the engine's lifecycle events and forwards
//! each as a `TrackEvent` action to the metrics sink. Forwarding is
//! fire-and-forget: a failed or slow metrics call is logged and never
//! propagates back into the engine's publish path.
//!
//! ```text
//!  TransactionController ──publish──→ Messenger ──→ TransactionEventRelay
//!                                                        │ TrackEvent
//!                                                        ▼
//!                                                 MetricsController
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod payload;
pub mod relay;

// Re-export main types
pub use payload::MetricsContext;
pub use relay::TransactionEventRelay;
