//! # Wallet Controllers - Registry and Initializer Contract
//!
//! Holds the factory for each stateful controller, resolves dependencies on
//! demand, caches singleton instances, and detects cyclic construction.
//!
//! ## How It Works
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ControllerRegistry                           │
//! │                                                                 │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐         │
//! │  │ Network  │  │ Accounts │  │  Relay   │  │   ...    │         │
//! │  │ resolved │  │ resolved │  │  lazy    │  │          │         │
//! │  └────┬─────┘  └────┬─────┘  └──────────┘  └──────────┘         │
//! │       │             │                                           │
//! │       └─────────────┴──────────────┐                            │
//! │                                    ▼                            │
//! │                          ┌─────────────────┐                    │
//! │                          │    Messenger    │                    │
//! │                          │  (wallet-bus)   │                    │
//! │                          └─────────────────┘                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No global topological sort is precomputed: ordering emerges from
//! first-use dependency pulls. Every pull is checked against the puller's
//! declared dependency list, so the dependency graph stays auditable and
//! an undeclared pull fails at startup rather than at first use.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod capabilities;
pub mod error;
pub mod init;
pub mod registry;

// Re-export main types
pub use capabilities::{controller_grant, init_grant, CapabilitySpec};
pub use error::RegistryError;
pub use init::{Controller, ControllerInit, InitRequest, InitResult, Resolver, SharedContext};
pub use registry::ControllerRegistry;
