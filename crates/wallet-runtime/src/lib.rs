//! # Wallet-Core Runtime
//!
//! The process entry point for the wallet orchestration layer.
//!
//! ## Startup Sequence
//!
//! 1. Build the messenger (one per process)
//! 2. Register controller initializers with the registry
//! 3. `init_all()` - controllers resolve lazily, dependency order emerges
//!    from declared pulls
//! 4. Install the publish pipeline hooks on the transaction engine
//! 5. Wire the transaction event relay
//! 6. Signal ready
//!
//! ```text
//!                       ┌────────────────────┐
//!                       │   WalletRuntime    │
//!                       └─────────┬──────────┘
//!            ┌────────────────────┼─────────────────────┐
//!            ▼                    ▼                     ▼
//!   ControllerRegistry      PublishPipeline    TransactionEventRelay
//!            │                    │                     │
//!            └────────────────────┴─────────────────────┘
//!                                 ▼
//!                             Messenger
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod controllers;
pub mod wiring;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use wallet_bus::Messenger;
use wallet_controllers::{controller_grant, init_grant, ControllerRegistry, SharedContext};
use wallet_relay::TransactionEventRelay;
use wallet_types::ControllerName;

pub use config::RuntimeConfig;
pub use controllers::{MetricsApi, TransactionsApi};

/// The assembled wallet process.
pub struct WalletRuntime {
    bus: Arc<Messenger>,
    registry: ControllerRegistry,
    event_relay: Arc<TransactionEventRelay>,
}

impl WalletRuntime {
    /// Build the runtime from configuration and previously persisted state
    /// (`Null` for a fresh profile). No controller runs until `start`.
    pub fn new(config: RuntimeConfig, persisted_state: serde_json::Value) -> Result<Self> {
        let bus = Arc::new(Messenger::new());
        let registry = wiring::build_registry(
            Arc::clone(&bus),
            &config,
            SharedContext::empty(),
            persisted_state,
        )?;
        let event_relay = Arc::new(TransactionEventRelay::new(
            bus.restricted(controller_grant(ControllerName::TransactionRelay)),
        ));
        Ok(Self {
            bus,
            registry,
            event_relay,
        })
    }

    /// Initialize every controller and wire the cross-cutting pieces.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Wallet-Core Runtime v0.1.0");
        info!("===========================================");

        self.registry.init_all()?;
        wiring::install_publish_pipeline(&self.bus, &self.registry)?;

        let context = TransactionEventRelay::build_context(
            &self
                .bus
                .restricted(init_grant(ControllerName::TransactionRelay)),
        )
        .await;
        self.event_relay.wire(context)?;

        info!("All controllers initialized and wired");
        Ok(())
    }

    /// The transaction engine's curated API.
    pub fn transactions(&self) -> Result<Arc<TransactionsApi>> {
        wiring::transactions_api(&self.registry)
    }

    /// The metrics sink's curated API.
    pub fn metrics(&self) -> Result<Arc<MetricsApi>> {
        wiring::metrics_api(&self.registry)
    }

    /// Snapshot of all persisted controller state, for the storage layer.
    #[must_use]
    pub fn persisted_state(&self) -> serde_json::Value {
        self.registry.persisted_state_snapshot()
    }

    /// Tear down subscriptions and take a final state snapshot.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.event_relay.shutdown();
        let snapshot = self.registry.persisted_state_snapshot();
        let keys = snapshot.as_object().map_or(0, serde_json::Map::len);
        info!(controllers = keys, "Final state snapshot taken");
        info!("Shutdown complete");
    }
}
