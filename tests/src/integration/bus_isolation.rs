//! Capability isolation across real controller grants.
//!
//! The capability table is the single source of truth for who may reach
//! what; these tests check the table end-to-end through restricted handles
//! rather than hand-built grants.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::BoxFuture;
    use parking_lot::Mutex;

    use wallet_bus::{
        ActionName, ActionResponse, BusError, CapabilityError, Messenger, WalletAction,
        WalletEvent,
    };
    use wallet_controllers::controller_grant;
    use wallet_types::{ChainId, ControllerName};

    use crate::support::{eligible_record, random_address};

    fn echo_handler(response: ActionResponse) -> wallet_bus::ActionHandler {
        Arc::new(
            move |_action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                let response = response.clone();
                Box::pin(async move { Ok(response) })
            },
        )
    }

    #[tokio::test]
    async fn test_accounts_cannot_reach_the_relay() {
        let bus = Arc::new(Messenger::new());
        bus.register_action(
            ActionName::IsSendBundleSupported,
            echo_handler(ActionResponse::Supported(true)),
        )
        .unwrap();

        // The accounts controller's real grant has no relay access.
        let handle = bus.restricted(controller_grant(ControllerName::Accounts));
        let err = handle
            .call(WalletAction::IsSendBundleSupported {
                chain_id: ChainId::MAINNET,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BusError::Capability(CapabilityError::ActionNotAllowed {
                component: ControllerName::Accounts,
                action: ActionName::IsSendBundleSupported,
            })
        ));
    }

    #[tokio::test]
    async fn test_pipeline_cannot_sign() {
        let bus = Arc::new(Messenger::new());
        let handle = bus.restricted(controller_grant(ControllerName::PublishPipeline));
        let err = handle
            .call(WalletAction::SignTransaction {
                transaction_id: wallet_types::TransactionId::generate(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BusError::Capability(CapabilityError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn test_only_the_owner_registers_handlers() {
        let bus = Arc::new(Messenger::new());
        let relay_handle = bus.restricted(controller_grant(ControllerName::TransactionRelay));
        // TrackEvent is callable by the relay but owned by metrics.
        let err = relay_handle
            .register_action(
                ActionName::TrackEvent,
                echo_handler(ActionResponse::Ack),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            BusError::Capability(CapabilityError::ForeignActionRegistration {
                owner: ControllerName::Metrics,
                ..
            })
        ));
    }

    #[test]
    fn test_foreign_lifecycle_publish_denied() {
        let bus = Arc::new(Messenger::new());
        let network = bus.restricted(controller_grant(ControllerName::Network));
        let err = network
            .publish(&WalletEvent::TransactionSubmitted(eligible_record(
                &random_address(),
            )))
            .unwrap_err();
        assert!(matches!(
            err,
            BusError::Capability(CapabilityError::ForeignEventPublish { .. })
        ));
    }

    #[test]
    fn test_middle_subscriber_panic_does_not_stop_fanout() {
        let bus = Arc::new(Messenger::new());
        let engine = bus.restricted(controller_grant(ControllerName::Transactions));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for index in 0..3_u32 {
            let seen = Arc::clone(&seen);
            engine
                .subscribe(
                    wallet_bus::EventName::TransactionSubmitted,
                    Arc::new(move |_event| {
                        if index == 1 {
                            panic!("listener bug");
                        }
                        seen.lock().push(index);
                    }),
                )
                .unwrap();
        }

        let delivered = engine
            .publish(&WalletEvent::TransactionSubmitted(eligible_record(
                &random_address(),
            )))
            .unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(*seen.lock(), vec![0, 2]);
    }
}
