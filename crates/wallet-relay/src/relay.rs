//! # Event Relay Wiring
//!
//! Subscribes to the fixed lifecycle set and forwards each event to the
//! metrics sink. Subscriptions are made exactly once per `wire` call and
//! collected in a teardown list, so relay instances can be torn down in
//! tests; the process runtime wires one instance for the process lifetime.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use wallet_bus::{
    BusError, EventName, RestrictedMessenger, SubscriptionId, WalletAction, WalletEvent,
};

use crate::payload::{payload_for, MetricsContext};

pub struct TransactionEventRelay {
    messenger: RestrictedMessenger,
    subscriptions: Mutex<Vec<(EventName, SubscriptionId)>>,
}

impl TransactionEventRelay {
    #[must_use]
    pub fn new(messenger: RestrictedMessenger) -> Self {
        Self {
            messenger,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Build the shared metrics context from the bootstrap handle.
    /// Best-effort: a failed read leaves the field empty rather than
    /// blocking startup.
    pub async fn build_context(init_messenger: &RestrictedMessenger) -> MetricsContext {
        let account_keyring = match Self::selected_account_keyring(init_messenger).await {
            Ok(keyring) => Some(keyring),
            Err(error) => {
                warn!(%error, "Could not resolve selected account keyring for metrics context");
                None
            }
        };
        MetricsContext { account_keyring }
    }

    async fn selected_account_keyring(
        init_messenger: &RestrictedMessenger,
    ) -> Result<wallet_types::KeyringType, BusError> {
        let address = init_messenger
            .call(WalletAction::GetSelectedAccount)
            .await?
            .into_account()?;
        init_messenger
            .call(WalletAction::GetAccountKeyringType { address })
            .await?
            .into_keyring_type()
    }

    /// Subscribe to every lifecycle event. Idempotence is the caller's
    /// responsibility; the registry's one-shot initializer cache guarantees
    /// it on the runtime path.
    ///
    /// # Errors
    ///
    /// A capability error here is a wiring bug and aborts startup.
    pub fn wire(self: &Arc<Self>, context: MetricsContext) -> Result<(), BusError> {
        let context = Arc::new(context);
        for &name in EventName::lifecycle() {
            let messenger = self.messenger.clone();
            let context = Arc::clone(&context);
            let id = self.messenger.subscribe(
                name,
                Arc::new(move |event: &WalletEvent| {
                    forward(&messenger, &context, event);
                }),
            )?;
            self.subscriptions.lock().push((name, id));
        }
        info!(
            events = EventName::lifecycle().len(),
            "Transaction event relay wired"
        );
        Ok(())
    }

    /// Tear down all subscriptions made by `wire`.
    pub fn shutdown(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        let count = subscriptions.len();
        for (name, id) in subscriptions {
            self.messenger.unsubscribe(name, id);
        }
        debug!(count, "Transaction event relay torn down");
    }
}

/// Forward one lifecycle event. The metrics call runs off the publish path;
/// failures are logged and never reach the engine.
fn forward(messenger: &RestrictedMessenger, context: &MetricsContext, event: &WalletEvent) {
    let Some(payload) = payload_for(event, context) else {
        return;
    };
    let event_name = event.name();
    let messenger = messenger.clone();
    tokio::spawn(async move {
        if let Err(error) = messenger
            .call(WalletAction::TrackEvent { payload })
            .await
        {
            warn!(event = %event_name, %error, "Metrics forwarding failed");
        }
    });
}
