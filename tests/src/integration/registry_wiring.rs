//! Registry behavior with the real runtime wiring.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wallet_bus::Messenger;
    use wallet_controllers::{
        Controller, ControllerInit, ControllerRegistry, InitRequest, InitResult, RegistryError,
        SharedContext,
    };
    use wallet_runtime::config::RuntimeConfig;
    use wallet_runtime::controllers::NetworkInit;
    use wallet_runtime::wiring::{build_registry, metrics_api, transactions_api};
    use wallet_types::ControllerName;

    #[tokio::test]
    async fn test_full_wiring_initializes_every_controller() {
        let bus = Arc::new(Messenger::new());
        let registry = build_registry(
            bus,
            &RuntimeConfig::default(),
            SharedContext::empty(),
            serde_json::Value::Null,
        )
        .unwrap();
        registry.init_all().unwrap();

        for name in [
            ControllerName::Network,
            ControllerName::Preferences,
            ControllerName::Accounts,
            ControllerName::Relay,
            ControllerName::Metrics,
            ControllerName::Transactions,
        ] {
            assert!(registry.controller(name).is_some(), "{name} missing");
        }

        // Curated APIs downcast to their concrete types.
        assert!(transactions_api(&registry).is_ok());
        assert!(metrics_api(&registry).is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_controller_rejected_in_wiring() {
        let bus = Arc::new(Messenger::new());
        let mut registry = build_registry(
            bus,
            &RuntimeConfig::default(),
            SharedContext::empty(),
            serde_json::Value::Null,
        )
        .unwrap();
        let err = registry
            .register(Box::new(NetworkInit {
                config: RuntimeConfig::default(),
            }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateController { .. }));
    }

    struct Leaf;

    impl Controller for Leaf {
        fn name(&self) -> ControllerName {
            ControllerName::Metrics
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    /// Pulls the network controller without declaring it.
    struct SneakyInit;

    impl ControllerInit for SneakyInit {
        fn name(&self) -> ControllerName {
            ControllerName::Metrics
        }

        fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
            request.registry.resolve(ControllerName::Network)?;
            Ok(InitResult::controller_only(Arc::new(Leaf)))
        }
    }

    #[test]
    fn test_undeclared_pull_fails_at_startup() {
        let bus = Arc::new(Messenger::new());
        let mut registry = ControllerRegistry::new(
            bus,
            SharedContext::empty(),
            serde_json::Value::Null,
        );
        registry
            .register(Box::new(NetworkInit {
                config: RuntimeConfig::default(),
            }))
            .unwrap();
        registry.register(Box::new(SneakyInit)).unwrap();

        let err = registry.resolve(ControllerName::Metrics).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UndeclaredDependency {
                controller: ControllerName::Metrics,
                dependency: ControllerName::Network,
            }
        ));
    }

    #[tokio::test]
    async fn test_persisted_preferences_slice_is_restored() {
        let bus = Arc::new(Messenger::new());
        let persisted = serde_json::json!({
            "PreferencesController": {
                "smart_transactions_enabled": true,
                "smart_transaction_chains": [1],
                "return_tx_hash_asap": true,
                "expected_deadline": 45,
                "max_deadline": 150,
            }
        });
        let registry = build_registry(
            bus,
            &RuntimeConfig::default(),
            SharedContext::empty(),
            persisted,
        )
        .unwrap();
        registry.init_all().unwrap();

        let snapshot = registry.persisted_state_snapshot();
        assert_eq!(
            snapshot["PreferencesController"]["smart_transactions_enabled"],
            true
        );
        assert_eq!(snapshot["PreferencesController"]["return_tx_hash_asap"], true);
    }
}
