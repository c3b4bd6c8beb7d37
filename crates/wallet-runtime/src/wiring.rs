//! # Runtime Wiring
//!
//! Assembles the process: registers every controller initializer with the
//! registry, installs the publish pipeline hooks on the transaction engine
//! after `init_all`, and wires the event relay. All handles are derived
//! from the capability table; nothing here reaches around the bus.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

use wallet_bus::Messenger;
use wallet_controllers::{controller_grant, ControllerRegistry, SharedContext};
use wallet_publish::{NonceLockPool, PublishPipeline};
use wallet_types::ControllerName;

use crate::config::RuntimeConfig;
use crate::controllers::{
    AccountsInit, MetricsApi, MetricsInit, NetworkInit, PreferencesInit, RelayInit,
    TransactionsApi, TransactionsInit,
};

/// Register all controller initializers, in startup order.
pub fn build_registry(
    bus: Arc<Messenger>,
    config: &RuntimeConfig,
    context: SharedContext,
    persisted_state: serde_json::Value,
) -> Result<ControllerRegistry> {
    let mut registry = ControllerRegistry::new(bus, context, persisted_state);
    registry.register(Box::new(NetworkInit {
        config: config.clone(),
    }))?;
    registry.register(Box::new(PreferencesInit {
        default_flags: config.feature_flags(),
    }))?;
    registry.register(Box::new(AccountsInit {
        config: config.clone(),
        delegated: Vec::new(),
    }))?;
    registry.register(Box::new(RelayInit {
        config: config.clone(),
    }))?;
    registry.register(Box::new(MetricsInit))?;
    registry.register(Box::new(TransactionsInit {
        config: config.clone(),
    }))?;
    Ok(registry)
}

/// Build the publish pipeline and install it on the initialized engine.
pub fn install_publish_pipeline(
    bus: &Arc<Messenger>,
    registry: &ControllerRegistry,
) -> Result<Arc<NonceLockPool>> {
    let api = transactions_api(registry)?;
    let nonce_locks = Arc::new(NonceLockPool::new());
    let pipeline = Arc::new(PublishPipeline::new(
        bus.restricted(controller_grant(ControllerName::PublishPipeline)),
        Arc::clone(&nonce_locks),
    ));
    api.install_pipeline(pipeline);
    info!("Publish pipeline installed on transaction engine");
    Ok(nonce_locks)
}

/// The engine's curated API, downcast from the registry.
pub fn transactions_api(registry: &ControllerRegistry) -> Result<Arc<TransactionsApi>> {
    registry
        .api(ControllerName::Transactions)
        .context("transaction controller exposes no API")?
        .downcast::<TransactionsApi>()
        .map_err(|_| anyhow!("transaction controller API has an unexpected type"))
}

/// The metrics sink's curated API, downcast from the registry.
pub fn metrics_api(registry: &ControllerRegistry) -> Result<Arc<MetricsApi>> {
    registry
        .api(ControllerName::Metrics)
        .context("metrics controller exposes no API")?
        .downcast::<MetricsApi>()
        .map_err(|_| anyhow!("metrics controller API has an unexpected type"))
}
