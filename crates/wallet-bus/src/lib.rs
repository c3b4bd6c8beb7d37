//! # Wallet Bus - Action/Event Bus for Inter-Controller Communication
//!
//! Typed publish/subscribe plus request/response broker. The bus is the root
//! dependency of every controller: controllers never hold references to each
//! other, only capability-scoped handles onto this bus.
//!
//! ## Rules
//!
//! - **Actions** are uniquely-owned request/response operations: at most one
//!   handler per action name, any caller on the allow-list.
//! - **Events** are many-subscriber notifications with no return value.
//! - Controllers receive a [`RestrictedMessenger`] whose allow-lists are
//!   fixed at creation time; calling outside them is a loud capability
//!   error, never a silent no-op.
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │ Controller A │                      │ Controller B │
//! │  (scoped     │   call / publish     │  (scoped     │
//! │   handle)    │ ───────┐             │   handle)    │
//! └──────────────┘        │             └──────────────┘
//!                         ▼                    ↑
//!                   ┌──────────────┐           │
//!                   │  Messenger   │ ──────────┘
//!                   │              │  handler / subscribe
//!                   └──────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! Created once per process at the entry point and passed down by reference;
//! never torn down except on process exit. Action/event registration is
//! expected to happen during the single-threaded startup phase.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod action;
pub mod error;
pub mod event;
pub mod messenger;
pub mod restricted;

// Re-export main types
pub use action::{
    ActionHandler, ActionName, ActionResponse, MetricsPayload, RelayFeeQuote, RelaySubmission,
    WalletAction,
};
pub use error::{BusError, CapabilityError};
pub use event::{EventListener, EventName, WalletEvent};
pub use messenger::{Messenger, SubscriptionId};
pub use restricted::{CapabilityGrant, RestrictedMessenger};
