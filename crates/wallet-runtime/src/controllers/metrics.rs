//! # Metrics Controller
//!
//! The `TrackEvent` sink. Payloads are buffered in memory and logged; a
//! production build would flush them to the analytics backend. The curated
//! API exposes the buffer read-only for tests and diagnostics.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

use wallet_bus::{ActionHandler, ActionName, ActionResponse, BusError, MetricsPayload, WalletAction};
use wallet_controllers::{Controller, ControllerInit, InitRequest, InitResult, RegistryError};
use wallet_types::ControllerName;

pub struct MetricsController {
    tracked: Mutex<Vec<MetricsPayload>>,
}

impl MetricsController {
    fn handle(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::TrackEvent { payload } => {
                debug!(event = %payload.event, category = %payload.category, "Tracked event");
                self.tracked.lock().push(payload);
                Ok(ActionResponse::Ack)
            }
            other => Err(BusError::handler(
                other.name(),
                "not handled by the metrics controller",
            )),
        }
    }
}

impl Controller for MetricsController {
    fn name(&self) -> ControllerName {
        ControllerName::Metrics
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Read-only view of tracked events.
pub struct MetricsApi {
    controller: Arc<MetricsController>,
}

impl MetricsApi {
    #[must_use]
    pub fn tracked(&self) -> Vec<MetricsPayload> {
        self.controller.tracked.lock().clone()
    }
}

pub struct MetricsInit;

impl ControllerInit for MetricsInit {
    fn name(&self) -> ControllerName {
        ControllerName::Metrics
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        let controller = Arc::new(MetricsController {
            tracked: Mutex::new(Vec::new()),
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
            .register_action(ActionName::TrackEvent, handler)?;

        let api = Arc::new(MetricsApi {
            controller: Arc::clone(&controller),
        });
        Ok(InitResult {
            controller,
            api: Some(api),
            persisted_state_key: None,
            mem_state_key: None,
        })
    }
}
