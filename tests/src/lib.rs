//! # Wallet-Core Test Suite
//!
//! Unified test crate for cross-crate flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared fixtures and the mock action harness
//! └── integration/      # Cross-controller flows
//!     ├── bus_isolation.rs
//!     ├── registry_wiring.rs
//!     ├── publish_flows.rs
//!     ├── batch_flows.rs
//!     └── runtime_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wallet-tests
//! cargo test -p wallet-tests integration::publish_flows
//! ```

#![allow(dead_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod integration;
pub mod support;
