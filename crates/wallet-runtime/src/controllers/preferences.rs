//! # Preferences Controller
//!
//! Serves the relay feature-flag snapshot. Flags are mutable at runtime
//! through the curated API (the UI toggles smart transactions); readers
//! re-fetch per publish attempt.

use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

use wallet_bus::{ActionHandler, ActionName, ActionResponse, BusError, WalletAction};
use wallet_controllers::{Controller, ControllerInit, InitRequest, InitResult, RegistryError};
use wallet_types::{ControllerName, FeatureFlags};

pub struct PreferencesController {
    flags: RwLock<FeatureFlags>,
}

impl PreferencesController {
    fn handle(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::GetFeatureFlags => {
                Ok(ActionResponse::FeatureFlags(self.flags.read().clone()))
            }
            other => Err(BusError::handler(
                other.name(),
                "not handled by the preferences controller",
            )),
        }
    }
}

impl Controller for PreferencesController {
    fn name(&self) -> ControllerName {
        ControllerName::Preferences
    }

    fn state_snapshot(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&*self.flags.read()).ok()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Curated surface for preference writes.
pub struct PreferencesApi {
    controller: Arc<PreferencesController>,
}

impl PreferencesApi {
    pub fn set_feature_flags(&self, flags: FeatureFlags) {
        info!(
            enabled = flags.smart_transactions_enabled,
            "Updating relay feature flags"
        );
        *self.controller.flags.write() = flags;
    }

    #[must_use]
    pub fn feature_flags(&self) -> FeatureFlags {
        self.controller.flags.read().clone()
    }
}

pub struct PreferencesInit {
    /// Flags used when no persisted state exists.
    pub default_flags: FeatureFlags,
}

impl ControllerInit for PreferencesInit {
    fn name(&self) -> ControllerName {
        ControllerName::Preferences
    }

    fn persisted_state_key(&self) -> Option<&'static str> {
        Some("PreferencesController")
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        let flags = if request.persisted_state.is_null() {
            self.default_flags.clone()
        } else {
            match serde_json::from_value(request.persisted_state.clone()) {
                Ok(flags) => flags,
                Err(error) => {
                    warn!(%error, "Discarding malformed persisted preferences");
                    self.default_flags.clone()
                }
            }
        };
        let controller = Arc::new(PreferencesController {
            flags: RwLock::new(flags),
        });

        let handler: ActionHandler = {
            let controller = Arc::clone(&controller);
            Arc::new(
                move |action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                    let controller = Arc::clone(&controller);
                    Box::pin(async move { controller.handle(action) })
                },
            )
        };
        request
            .messenger
            .register_action(ActionName::GetFeatureFlags, handler)?;

        let api = Arc::new(PreferencesApi {
            controller: Arc::clone(&controller),
        });
        Ok(InitResult {
            controller,
            api: Some(api),
            persisted_state_key: Some("PreferencesController"),
            mem_state_key: None,
        })
    }
}
