//! # Wallet Types Crate
//!
//! This crate contains the domain types shared across the wallet workspace:
//! identifiers, the transaction record with its status machine, and the
//! relay feature flags.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Closed enumerations**: controller names, statuses, and transaction
//!   types are closed enums so capability tables and dispatch maps can be
//!   checked at compile time.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod flags;
pub mod ids;
pub mod transaction;

pub use flags::FeatureFlags;
pub use ids::{Address, ChainId, ControllerName, NetworkClientId, TransactionId, TxHash};
pub use transaction::{
    KeyringType, NetworkClientInfo, TransactionRecord, TransactionStatus, TransactionType,
    TxParams,
};
